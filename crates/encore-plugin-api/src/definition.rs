//! The code-authored description of a plugin.

use crate::component::{Component, Icon};
use crate::error::PluginResult;
use crate::http::{ApiRequest, HttpMethod, HttpResponse};
use crate::matcher::{RouteParams, Routable};
use crate::settings::SettingField;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Translation messages for one locale, keyed by namespace.
pub type Messages = Map<String, Value>;

type HandlerFn = dyn Fn(ApiRequest, RouteParams) -> BoxFuture<'static, PluginResult<HttpResponse>> + Send + Sync;
type HookFn = dyn Fn() -> BoxFuture<'static, PluginResult<()>> + Send + Sync;

/// A plugin API endpoint handler.
///
/// Handler errors become JSON error responses carrying
/// [`crate::PluginError::status`].
#[derive(Clone)]
pub struct ApiHandler(Arc<HandlerFn>);

impl ApiHandler {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(ApiRequest, RouteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<HttpResponse>> + Send + 'static,
    {
        Self(Arc::new(move |req, params| Box::pin(handler(req, params))))
    }

    /// Invokes the handler, folding errors into a response.
    pub async fn call(&self, request: ApiRequest, params: RouteParams) -> HttpResponse {
        match (self.0)(request, params).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }
}

impl fmt::Debug for ApiHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiHandler")
    }
}

/// An asynchronous enable/disable side effect.
#[derive(Clone)]
pub struct LifecycleHook(Arc<HookFn>);

impl LifecycleHook {
    pub fn new<F, Fut>(hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<()>> + Send + 'static,
    {
        Self(Arc::new(move || Box::pin(hook())))
    }

    /// Runs the hook.
    ///
    /// # Errors
    ///
    /// Propagates the hook's error; callers decide whether to swallow it.
    pub async fn run(&self) -> PluginResult<()> {
        (self.0)().await
    }
}

impl fmt::Debug for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LifecycleHook")
    }
}

/// Admin sidebar entry.
#[derive(Debug, Clone)]
pub struct NavigationEntry {
    pub name: String,
    pub href: String,
    pub icon: Icon,
}

impl NavigationEntry {
    pub fn new(name: impl Into<String>, href: impl Into<String>, icon: Icon) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
            icon,
        }
    }
}

/// An admin or public page: a path pattern plus the component it renders.
#[derive(Debug, Clone)]
pub struct PageRoute {
    pub path: String,
    pub component: Component,
}

impl Routable for PageRoute {
    fn pattern(&self) -> &str {
        &self.path
    }
}

/// An API endpoint: a path pattern plus one handler per declared method.
#[derive(Debug, Clone)]
pub struct ApiRoute {
    pub path: String,
    pub handlers: BTreeMap<HttpMethod, ApiHandler>,
}

impl ApiRoute {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            handlers: BTreeMap::new(),
        }
    }

    /// Declares the handler for `method`, replacing any previous one.
    #[must_use]
    pub fn handler<F, Fut>(mut self, method: HttpMethod, handler: F) -> Self
    where
        F: Fn(ApiRequest, RouteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<HttpResponse>> + Send + 'static,
    {
        self.handlers.insert(method, ApiHandler::new(handler));
        self
    }

    #[must_use]
    pub fn get<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(ApiRequest, RouteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<HttpResponse>> + Send + 'static,
    {
        self.handler(HttpMethod::Get, handler)
    }

    #[must_use]
    pub fn post<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(ApiRequest, RouteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<HttpResponse>> + Send + 'static,
    {
        self.handler(HttpMethod::Post, handler)
    }

    #[must_use]
    pub fn put<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(ApiRequest, RouteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<HttpResponse>> + Send + 'static,
    {
        self.handler(HttpMethod::Put, handler)
    }

    #[must_use]
    pub fn patch<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(ApiRequest, RouteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<HttpResponse>> + Send + 'static,
    {
        self.handler(HttpMethod::Patch, handler)
    }

    #[must_use]
    pub fn delete<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(ApiRequest, RouteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<HttpResponse>> + Send + 'static,
    {
        self.handler(HttpMethod::Delete, handler)
    }

    #[must_use]
    pub fn handler_for(&self, method: HttpMethod) -> Option<&ApiHandler> {
        self.handlers.get(&method)
    }

    /// Declared methods in a stable order.
    #[must_use]
    pub fn methods(&self) -> Vec<HttpMethod> {
        self.handlers.keys().copied().collect()
    }
}

impl Routable for ApiRoute {
    fn pattern(&self) -> &str {
        &self.path
    }
}

/// A section injected into the site homepage.
#[derive(Debug, Clone)]
pub struct HomepageSection {
    /// Higher values render first.
    pub priority: i32,
    pub component: Component,
}

/// Static, immutable description of one plugin's capabilities.
///
/// Built once by the plugin module and never mutated after registration.
#[derive(Debug, Clone)]
pub struct PluginDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: Option<String>,
    pub default_public_path: Option<String>,
    pub admin_navigation: Option<NavigationEntry>,
    pub admin_pages: Vec<PageRoute>,
    pub public_pages: Vec<PageRoute>,
    pub api_routes: Vec<ApiRoute>,
    pub homepage_section: Option<HomepageSection>,
    pub settings_fields: Vec<SettingField>,
    /// Locale -> namespace -> messages.
    pub translations: BTreeMap<String, Messages>,
    pub on_enable: Option<LifecycleHook>,
    pub on_disable: Option<LifecycleHook>,
}

impl PluginDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            version: version.into(),
            author: None,
            default_public_path: None,
            admin_navigation: None,
            admin_pages: Vec::new(),
            public_pages: Vec::new(),
            api_routes: Vec::new(),
            homepage_section: None,
            settings_fields: Vec::new(),
            translations: BTreeMap::new(),
            on_enable: None,
            on_disable: None,
        }
    }

    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn default_public_path(mut self, path: impl Into<String>) -> Self {
        self.default_public_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn admin_navigation(mut self, entry: NavigationEntry) -> Self {
        self.admin_navigation = Some(entry);
        self
    }

    #[must_use]
    pub fn admin_page(mut self, path: impl Into<String>, component: Component) -> Self {
        self.admin_pages.push(PageRoute {
            path: path.into(),
            component,
        });
        self
    }

    #[must_use]
    pub fn public_page(mut self, path: impl Into<String>, component: Component) -> Self {
        self.public_pages.push(PageRoute {
            path: path.into(),
            component,
        });
        self
    }

    #[must_use]
    pub fn api_route(mut self, route: ApiRoute) -> Self {
        self.api_routes.push(route);
        self
    }

    #[must_use]
    pub fn homepage_section(mut self, priority: i32, component: Component) -> Self {
        self.homepage_section = Some(HomepageSection { priority, component });
        self
    }

    #[must_use]
    pub fn setting(mut self, field: SettingField) -> Self {
        self.settings_fields.push(field);
        self
    }

    #[must_use]
    pub fn translations(mut self, locale: impl Into<String>, messages: Messages) -> Self {
        self.translations.insert(locale.into(), messages);
        self
    }

    #[must_use]
    pub fn on_enable<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<()>> + Send + 'static,
    {
        self.on_enable = Some(LifecycleHook::new(hook));
        self
    }

    #[must_use]
    pub fn on_disable<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<()>> + Send + 'static,
    {
        self.on_disable = Some(LifecycleHook::new(hook));
        self
    }

    /// Looks up `translations[locale][namespace][key]` as a string.
    #[must_use]
    pub fn message(&self, locale: &str, namespace: &str, key: &str) -> Option<&str> {
        self.translations
            .get(locale)?
            .get(namespace)?
            .get(key)?
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PluginError;
    use serde_json::json;

    fn page(name: &'static str) -> Component {
        Component::new(name, |_| async { Ok(String::new()) })
    }

    #[test]
    fn test_builder_preserves_declaration_order() {
        let def = PluginDefinition::new("photos", "Photo Albums", "Albums", "1.0.0")
            .admin_page("", page("List"))
            .admin_page("new", page("New"))
            .admin_page("[id]", page("Edit"))
            .api_route(ApiRoute::new("upload").post(|_, _| async { Ok(HttpResponse::empty(201)) }))
            .api_route(ApiRoute::new("[id]").get(|_, _| async { Ok(HttpResponse::empty(200)) }));

        let paths: Vec<_> = def.admin_pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["", "new", "[id]"]);
        assert_eq!(def.api_routes[0].methods(), vec![HttpMethod::Post]);
        assert!(def.api_routes[1].handler_for(HttpMethod::Delete).is_none());
    }

    #[tokio::test]
    async fn test_handler_errors_become_responses() {
        let route = ApiRoute::new("[id]")
            .get(|_, params: RouteParams| async move {
                Err::<HttpResponse, _>(PluginError::not_found(format!("Concert {} not found", params["id"])))
            });

        let mut params = RouteParams::new();
        params.insert("id".into(), "9".into());
        let handler = route.handler_for(HttpMethod::Get).unwrap();
        let response = handler.call(ApiRequest::new(HttpMethod::Get, "9"), params).await;

        assert_eq!(response.status, 404);
        assert!(String::from_utf8_lossy(&response.body).contains("Concert 9 not found"));
    }

    #[tokio::test]
    async fn test_lifecycle_hooks() {
        let def = PluginDefinition::new("concerts", "Concerts", "Events", "1.0.0")
            .on_enable(|| async { Ok(()) })
            .on_disable(|| async { Err::<(), _>(PluginError::Hook("cleanup failed".into())) });

        assert!(def.on_enable.as_ref().unwrap().run().await.is_ok());
        assert!(def.on_disable.as_ref().unwrap().run().await.is_err());
    }

    #[test]
    fn test_message_lookup() {
        let nl = json!({ "concerts": { "navName": "Concerten" } });
        let def = PluginDefinition::new("concerts", "Concerts", "Events", "1.0.0")
            .translations("nl", nl.as_object().cloned().unwrap());

        assert_eq!(def.message("nl", "concerts", "navName"), Some("Concerten"));
        assert_eq!(def.message("en", "concerts", "navName"), None);
        assert_eq!(def.message("nl", "concerts", "missing"), None);
    }
}

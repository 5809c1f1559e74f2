//! Renderable slots of a plugin definition.
//!
//! Components and icons are opaque to the host: it only ever calls them and
//! never serializes them.

use crate::error::PluginResult;
use crate::matcher::RouteParams;
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Future returned by a component render.
pub type RenderFuture = BoxFuture<'static, PluginResult<String>>;

/// Props passed to page and homepage-section components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageProps {
    pub plugin_id: String,
    /// Parameters bound by the matched page pattern.
    pub params: RouteParams,
    /// Effective public base path; absent on admin pages.
    pub public_path: Option<String>,
    pub query: BTreeMap<String, String>,
}

impl PageProps {
    pub fn new(plugin_id: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            ..Self::default()
        }
    }

    /// Returns a bound route parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

type RenderFn = dyn Fn(PageProps) -> RenderFuture + Send + Sync;

/// A named asynchronous renderer producing an HTML fragment.
#[derive(Clone)]
pub struct Component {
    name: &'static str,
    render: Arc<RenderFn>,
}

impl Component {
    pub fn new<F, Fut>(name: &'static str, render: F) -> Self
    where
        F: Fn(PageProps) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<String>> + Send + 'static,
    {
        Self {
            name,
            render: Arc::new(move |props| Box::pin(render(props))),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Renders the component.
    ///
    /// # Errors
    ///
    /// Propagates the renderer's error.
    pub async fn render(&self, props: PageProps) -> PluginResult<String> {
        (self.render)(props).await
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

/// Navigation icon: a name plus inline SVG markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    name: &'static str,
    svg: &'static str,
}

impl Icon {
    #[must_use]
    pub const fn new(name: &'static str, svg: &'static str) -> Self {
        Self { name, svg }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn svg(&self) -> &'static str {
        self.svg
    }

    /// Returns true if the markup is a renderable `<svg>` element.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        let svg = self.svg.trim();
        svg.starts_with("<svg") && svg.ends_with("</svg>")
    }
}

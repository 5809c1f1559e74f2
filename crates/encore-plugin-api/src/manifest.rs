//! Serializable view of a definition with every component, icon, handler and
//! hook stripped. This is the only shape of a definition that crosses a
//! process or network boundary.

use crate::definition::PluginDefinition;
use crate::http::HttpMethod;
use crate::settings::SettingField;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginManifest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_public_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_navigation: Option<NavigationSummary>,
    #[serde(default)]
    pub admin_pages: Vec<String>,
    #[serde(default)]
    pub public_pages: Vec<String>,
    #[serde(default)]
    pub api_routes: Vec<ApiRouteSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage_section: Option<HomepageSummary>,
    #[serde(default)]
    pub settings_fields: Vec<SettingField>,
    /// Declared locales.
    #[serde(default)]
    pub locales: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSummary {
    pub name: String,
    pub href: String,
    /// Icon name only; markup stays server side.
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRouteSummary {
    pub path: String,
    pub methods: Vec<HttpMethod>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomepageSummary {
    pub priority: i32,
}

impl From<&PluginDefinition> for PluginManifest {
    fn from(def: &PluginDefinition) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            description: def.description.clone(),
            version: def.version.clone(),
            author: def.author.clone(),
            default_public_path: def.default_public_path.clone(),
            admin_navigation: def.admin_navigation.as_ref().map(|nav| NavigationSummary {
                name: nav.name.clone(),
                href: nav.href.clone(),
                icon: nav.icon.name().to_string(),
            }),
            admin_pages: def.admin_pages.iter().map(|p| p.path.clone()).collect(),
            public_pages: def.public_pages.iter().map(|p| p.path.clone()).collect(),
            api_routes: def
                .api_routes
                .iter()
                .map(|r| ApiRouteSummary {
                    path: r.path.clone(),
                    methods: r.methods(),
                })
                .collect(),
            homepage_section: def
                .homepage_section
                .as_ref()
                .map(|s| HomepageSummary { priority: s.priority }),
            settings_fields: def.settings_fields.clone(),
            locales: def.translations.keys().cloned().collect(),
        }
    }
}

impl PluginDefinition {
    /// Returns the serializable view of this definition.
    #[must_use]
    pub fn manifest(&self) -> PluginManifest {
        PluginManifest::from(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::component::{Component, Icon};
    use crate::definition::{ApiRoute, NavigationEntry, PluginDefinition};
    use crate::http::HttpResponse;

    #[test]
    fn test_manifest_strips_components() {
        let def = PluginDefinition::new("concerts", "Concerts", "Events", "1.0.0")
            .default_public_path("/concerts")
            .admin_navigation(NavigationEntry::new(
                "Concerts",
                "/admin/p/concerts",
                Icon::new("calendar", "<svg></svg>"),
            ))
            .admin_page("", Component::new("ConcertList", |_| async { Ok(String::new()) }))
            .api_route(
                ApiRoute::new("")
                    .get(|_, _| async { Ok(HttpResponse::empty(200)) })
                    .post(|_, _| async { Ok(HttpResponse::empty(201)) }),
            )
            .homepage_section(10, Component::new("Upcoming", |_| async { Ok(String::new()) }));

        let json = serde_json::to_value(def.manifest()).unwrap();
        assert_eq!(json["defaultPublicPath"], "/concerts");
        assert_eq!(json["adminNavigation"]["icon"], "calendar");
        assert_eq!(json["adminPages"][0], "");
        assert_eq!(json["apiRoutes"][0]["methods"], serde_json::json!(["GET", "POST"]));
        assert_eq!(json["homepageSection"]["priority"], 10);
        assert!(!json.to_string().contains("ConcertList"));
    }
}

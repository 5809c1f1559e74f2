//! # Encore Concerts Plugin
//!
//! Concerts, shows and events with venue information, dates and ticket
//! links.
//!
//! - Admin pages: list, new, edit (`/admin/p/concerts[/new|/{id}]`)
//! - Public page listing upcoming and past concerts
//! - Homepage section with the next upcoming concerts
//! - CRUD API under `/api/p/concerts`

pub mod api;
pub mod i18n;
pub mod model;
pub mod pages;
pub mod store;

use encore_plugin_api::{
    Icon, NavigationEntry, PluginDefinition, PluginResult, SettingField, SettingFieldType, SettingValue,
};
use pages::Pages;
use std::sync::Arc;
use tracing::info;

pub use model::{Concert, ConcertInput};
pub use store::ConcertStore;

pub const PLUGIN_ID: &str = "concerts";

const CALENDAR_ICON: Icon = Icon::new(
    "calendar",
    r#"<svg fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M8 7V3m8 4V3m-9 8h10M5 21h14a2 2 0 002-2V7a2 2 0 00-2-2H5a2 2 0 00-2 2v12a2 2 0 002 2z"/></svg>"#,
);

/// Builds the concerts plugin around `store`.
///
/// # Errors
///
/// Fails if the bundled translations cannot be parsed.
pub fn definition(store: Arc<ConcertStore>) -> PluginResult<PluginDefinition> {
    let translations = i18n::load()?;
    let pages = Pages::new(Arc::clone(&store), i18n::translator(translations.clone()));

    let mut plugin = PluginDefinition::new(
        PLUGIN_ID,
        "Concerts",
        "Manage concerts, shows, and events with venue information, dates, and ticket links.",
        "1.0.0",
    )
    .author("CMS Team")
    .default_public_path("/concerts")
    .admin_navigation(NavigationEntry::new("Concerts", "/admin/p/concerts", CALENDAR_ICON))
    .admin_page("", pages.list())
    .admin_page("new", pages.new_page())
    .admin_page("[id]", pages.edit())
    .public_page("", pages.public())
    .homepage_section(10, pages.homepage())
    .setting(
        SettingField::new("showPastConcerts", "Show past concerts", SettingFieldType::Boolean)
            .description("List past concerts below the upcoming ones on the public page")
            .default_value(SettingValue::Bool(true)),
    )
    .setting(
        SettingField::new("ticketProvider", "Default ticket provider", SettingFieldType::Url)
            .description("Used when a concert has no ticket link of its own"),
    )
    .on_enable(|| async {
        info!(plugin_id = PLUGIN_ID, "Concerts plugin enabled");
        Ok(())
    })
    .on_disable(|| async {
        info!(plugin_id = PLUGIN_ID, "Concerts plugin disabled");
        Ok(())
    });

    for route in api::routes(&store) {
        plugin = plugin.api_route(route);
    }
    for (locale, messages) in translations {
        plugin = plugin.translations(locale, messages);
    }
    Ok(plugin)
}

//! # Encore Photos Plugin
//!
//! Photo albums with uploads, a public gallery and per-album pages.
//!
//! ```text
//! /admin/p/photos            album list
//! /admin/p/photos/new        create album
//! /admin/p/photos/{id}       edit album, upload and reorder photos
//! {publicPath}               gallery of published albums
//! {publicPath}/{slug}        album view
//! /api/p/photos/...          JSON API and file serving
//! ```

pub mod api;
pub mod i18n;
pub mod model;
pub mod pages;
pub mod storage;
pub mod store;

use encore_plugin_api::{
    Icon, NavigationEntry, PluginDefinition, PluginResult, SettingField, SettingFieldType, SettingValue,
};
use pages::Pages;
use std::sync::Arc;
use tracing::info;

pub use model::{Album, AlbumSummary, Photo};
pub use storage::{FileStorage, MemoryFileStorage};
pub use store::AlbumStore;

pub const PLUGIN_ID: &str = "photos";

const PHOTO_ICON: Icon = Icon::new(
    "photo",
    r#"<svg fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M4 16l4.586-4.586a2 2 0 012.828 0L16 16m-2-2l1.586-1.586a2 2 0 012.828 0L20 14m-6-6h.01M6 20h12a2 2 0 002-2V6a2 2 0 00-2-2H6a2 2 0 00-2 2v12a2 2 0 002 2z"/></svg>"#,
);

/// Builds the photos plugin around an album store and a file backend.
///
/// # Errors
///
/// Fails if the bundled translations cannot be parsed.
pub fn definition(albums: Arc<AlbumStore>, files: Arc<dyn FileStorage>) -> PluginResult<PluginDefinition> {
    let translations = i18n::load()?;
    let pages = Pages::new(Arc::clone(&albums), i18n::translator(translations.clone()));
    let storage_name = files.name().to_string();

    let mut plugin = PluginDefinition::new(
        PLUGIN_ID,
        "Photo Albums",
        "Create and manage photo albums with drag & drop uploads, lightbox viewing, and flexible storage options.",
        "1.0.0",
    )
    .author("CMS Team")
    .default_public_path("/photos")
    .admin_navigation(NavigationEntry::new("Photo Albums", "/admin/p/photos", PHOTO_ICON))
    .admin_page("", pages.album_list())
    .admin_page("new", pages.album_new())
    .admin_page("[id]", pages.album_edit())
    .public_page("", pages.gallery())
    .public_page("[slug]", pages.album_view())
    .homepage_section(5, pages.homepage())
    .setting(
        SettingField::new("albumsPerPage", "Albums per page", SettingFieldType::Number)
            .default_value(SettingValue::Number(12.0)),
    )
    .setting(
        SettingField::new("thumbnailSize", "Thumbnail size", SettingFieldType::Select)
            .option("Small", "small")
            .option("Medium", "medium")
            .option("Large", "large")
            .default_value(SettingValue::Text("medium".into())),
    )
    .setting(
        SettingField::new("enableLightbox", "Enable lightbox", SettingFieldType::Boolean)
            .description("Open photos in an overlay on album pages")
            .default_value(SettingValue::Bool(true)),
    )
    .on_enable(move || {
        let storage = storage_name.clone();
        async move {
            info!(plugin_id = PLUGIN_ID, %storage, "Photos plugin enabled");
            Ok(())
        }
    })
    .on_disable(|| async {
        info!(plugin_id = PLUGIN_ID, "Photos plugin disabled");
        Ok(())
    });

    for route in api::routes(&api::Context { albums, files }) {
        plugin = plugin.api_route(route);
    }
    for (locale, messages) in translations {
        plugin = plugin.translations(locale, messages);
    }
    Ok(plugin)
}

//! Plugins compiled into the server.

use encore_concerts_plugin::ConcertStore;
use encore_photos_plugin::{AlbumStore, FileStorage, MemoryFileStorage};
use encore_plugin_runtime::PluginCatalog;
use std::sync::Arc;

/// Catalog of the built-in plugins in registration order.
///
/// Record stores are created once and shared by every factory call, so a
/// registry reload keeps existing concerts and albums.
#[must_use]
pub fn builtin_catalog() -> PluginCatalog {
    let concerts = Arc::new(ConcertStore::new());
    let albums = Arc::new(AlbumStore::new());
    let files: Arc<dyn FileStorage> = Arc::new(MemoryFileStorage::new());

    PluginCatalog::new()
        .module(encore_concerts_plugin::PLUGIN_ID, move || {
            let store = Arc::clone(&concerts);
            async move { encore_concerts_plugin::definition(store) }
        })
        .module(encore_photos_plugin::PLUGIN_ID, move || {
            let albums = Arc::clone(&albums);
            let files = Arc::clone(&files);
            async move { encore_photos_plugin::definition(albums, files) }
        })
}

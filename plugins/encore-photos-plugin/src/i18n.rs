//! Bundled translations.

use encore_plugin_api::i18n::parse_bundles;
use encore_plugin_api::{Messages, PluginResult, Translator};
use std::collections::BTreeMap;

pub const NAMESPACE: &str = "photos";
pub const DEFAULT_LOCALE: &str = "en";

const BUNDLES: [(&str, &str); 2] = [
    ("en", include_str!("../i18n/en.json")),
    ("nl", include_str!("../i18n/nl.json")),
];

/// Parses every bundled locale.
///
/// # Errors
///
/// Fails when a bundle is not a JSON object.
pub fn load() -> PluginResult<BTreeMap<String, Messages>> {
    parse_bundles(&BUNDLES)
}

#[must_use]
pub fn translator(bundles: BTreeMap<String, Messages>) -> Translator {
    Translator::new(NAMESPACE, DEFAULT_LOCALE, bundles)
}

//! Translation bundles for plugins that render their own pages.

use crate::definition::Messages;
use crate::error::{PluginError, PluginResult};
use std::collections::BTreeMap;

/// Parses `(locale, json)` pairs, typically from `include_str!`.
///
/// # Errors
///
/// Returns [`PluginError::Load`] naming the first bundle that is not a JSON
/// object.
pub fn parse_bundles(bundles: &[(&str, &str)]) -> PluginResult<BTreeMap<String, Messages>> {
    bundles
        .iter()
        .map(|(locale, raw)| {
            let messages: Messages = serde_json::from_str(raw)
                .map_err(|e| PluginError::Load(format!("invalid {locale} translations: {e}")))?;
            Ok(((*locale).to_string(), messages))
        })
        .collect()
}

/// Looks up dotted keys in one namespace, falling back to the default
/// locale and then to the key itself.
#[derive(Debug, Clone)]
pub struct Translator {
    namespace: String,
    default_locale: String,
    bundles: BTreeMap<String, Messages>,
}

impl Translator {
    pub fn new(
        namespace: impl Into<String>,
        default_locale: impl Into<String>,
        bundles: BTreeMap<String, Messages>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            default_locale: default_locale.into(),
            bundles,
        }
    }

    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Resolves a key such as `admin.save`.
    #[must_use]
    pub fn text<'a>(&'a self, locale: &str, key: &'a str) -> &'a str {
        self.lookup(locale, key)
            .or_else(|| self.lookup(&self.default_locale, key))
            .unwrap_or(key)
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        let mut value = self.bundles.get(locale)?.get(&self.namespace)?;
        for part in key.split('.') {
            value = value.get(part)?;
        }
        value.as_str()
    }
}

//! # Encore Plugin API
//!
//! The contract between the Encore host and its plugins.
//!
//! A plugin is a [`PluginDefinition`]: metadata plus admin pages, public
//! pages, API routes, a homepage section, a settings schema, translations
//! and lifecycle hooks. Pages and routes are declared as path patterns
//! (`""`, `"new"`, `"[id]"`, `"[id]/photos"`) resolved by the [`matcher`].
//! The [`validation`] module checks definitions statically, including the
//! route ordering rule that keeps static routes reachable.

pub mod component;
pub mod definition;
pub mod error;
pub mod html;
pub mod i18n;
pub mod http;
pub mod manifest;
pub mod matcher;
pub mod settings;
pub mod validation;

pub use component::{Component, Icon, PageProps};
pub use definition::{
    ApiHandler, ApiRoute, HomepageSection, LifecycleHook, Messages, NavigationEntry, PageRoute,
    PluginDefinition,
};
pub use error::{PluginError, PluginResult};
pub use http::{ApiRequest, HttpMethod, HttpResponse};
pub use i18n::Translator;
pub use manifest::PluginManifest;
pub use matcher::{RouteParams, Routable};
pub use settings::{SelectOption, SettingField, SettingFieldType, SettingValue};
pub use validation::ValidationReport;

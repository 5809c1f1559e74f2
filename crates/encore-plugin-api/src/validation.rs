//! Static checks run against a plugin definition.
//!
//! Validation is read-only: it never touches the registry or persisted
//! state. Errors make a definition invalid; warnings are advisory.

use crate::definition::PluginDefinition;
use crate::manifest::PluginManifest;
use crate::matcher::{dynamic_name, split_path, Routable};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

static PLUGIN_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("valid plugin id regex"));

/// Outcome of one or more checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Appends another report's findings.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Structural checks: required metadata, id format, navigation, pages,
/// API routes, translations, path patterns and settings schema.
#[must_use]
pub fn validate_plugin(plugin: &PluginDefinition) -> ValidationReport {
    let mut report = ValidationReport::default();

    if plugin.id.is_empty() {
        report.error("Plugin must have an id");
    }
    if plugin.name.is_empty() {
        report.error("Plugin must have a name");
    }
    if plugin.description.is_empty() {
        report.error("Plugin must have a description");
    }
    if plugin.version.is_empty() {
        report.error("Plugin must have a version");
    }

    if !plugin.id.is_empty() && !PLUGIN_ID.is_match(&plugin.id) {
        report.error(format!(
            "Plugin id \"{}\" must be lowercase, start with a letter, and contain only letters, numbers, and hyphens",
            plugin.id
        ));
    }

    if let Some(nav) = &plugin.admin_navigation {
        if nav.name.is_empty() {
            report.error("Admin navigation must have a name");
        }
        if nav.href.is_empty() {
            report.error("Admin navigation must have an href");
        }
        if !nav.icon.is_renderable() {
            report.error("Admin navigation icon must be a renderable SVG component");
        }
    }

    if !plugin.admin_pages.is_empty() {
        if !plugin.admin_pages.iter().any(|p| p.path.is_empty()) {
            report.warning("Admin pages should include a root page (path: \"\") for the main listing");
        }
        report.merge(validate_route_ordering("Admin page", &plugin.admin_pages));
    }

    report.merge(validate_route_ordering("Public page", &plugin.public_pages));

    report.merge(validate_api_route_ordering(&plugin.api_routes));
    for route in &plugin.api_routes {
        if route.handlers.is_empty() {
            report.error(format!(
                "API route \"{}\" must have at least one HTTP method handler",
                route.path
            ));
        }
    }

    let patterns = plugin
        .admin_pages
        .iter()
        .map(|p| p.path.as_str())
        .chain(plugin.public_pages.iter().map(|p| p.path.as_str()))
        .chain(plugin.api_routes.iter().map(|r| r.path.as_str()));
    for pattern in patterns {
        report.merge(validate_pattern(pattern));
    }

    report.merge(validate_translations(plugin));
    report.merge(validate_settings(plugin));

    report
}

/// Flags static single-segment API routes shadowed by an earlier `[param]`.
#[must_use]
pub fn validate_api_route_ordering<R: Routable>(routes: &[R]) -> ValidationReport {
    validate_route_ordering("API route", routes)
}

/// Ordering check shared by API routes and page lists.
///
/// A single dynamic segment claims every one-segment request, so any
/// one-segment static route declared after it is unreachable (error).
/// Other full shadowing, such as two identical patterns or `[a]/x` before
/// `[b]/x`, is reported as a warning.
#[must_use]
pub fn validate_route_ordering<R: Routable>(kind: &str, routes: &[R]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (i, route) in routes.iter().enumerate() {
        let path = route.pattern();
        let segments = split_path(path);
        let single_dynamic = is_single_dynamic(&segments);

        for later in &routes[i + 1..] {
            let later_path = later.pattern();
            let later_segments = split_path(later_path);

            if single_dynamic && later_segments.len() == 1 && dynamic_name(later_segments[0]).is_none() {
                report.error(format!(
                    "{kind} ordering issue: Static route \"{later_path}\" should come BEFORE dynamic route \"{path}\" to avoid incorrect matching"
                ));
            } else if shadows(&segments, &later_segments) {
                report.warning(format!(
                    "{kind} \"{later_path}\" is unreachable: \"{path}\" is declared earlier and matches the same requests"
                ));
            }
        }
    }

    report
}

/// Same notion of "dynamic" as the matcher, so `[photo-id]` and `/[id]` count.
fn is_single_dynamic(segments: &[&str]) -> bool {
    matches!(segments, [only] if dynamic_name(only).is_some())
}

/// True when every request matched by `later` is already matched by `earlier`.
fn shadows(earlier: &[&str], later: &[&str]) -> bool {
    earlier.len() == later.len()
        && earlier
            .iter()
            .zip(later)
            .all(|(e, l)| dynamic_name(e).is_some() || e == l)
}

/// Rejects malformed bracket segments and duplicate parameter names.
#[must_use]
pub fn validate_pattern(pattern: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen = HashSet::new();

    for segment in split_path(pattern) {
        if let Some(name) = dynamic_name(segment) {
            if !seen.insert(name) {
                report.error(format!(
                    "Route pattern \"{pattern}\" declares parameter \"{name}\" more than once"
                ));
            }
        } else if segment.contains(['[', ']']) {
            report.error(format!(
                "Route pattern \"{pattern}\" has malformed segment \"{segment}\""
            ));
        }
    }

    report
}

/// Warns about message keys present in one locale but missing in another.
///
/// Nested namespaces are compared by dotted key path against the first
/// declared locale.
#[must_use]
pub fn validate_translations(plugin: &PluginDefinition) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut locales = plugin.translations.iter();

    let Some((_, reference)) = locales.next() else {
        return report;
    };
    let reference_keys = flatten_keys(reference);

    for (locale, messages) in locales {
        let keys = flatten_keys(messages);

        let missing: Vec<&str> = reference_keys.difference(&keys).map(String::as_str).collect();
        if !missing.is_empty() {
            report.warning(format!(
                "Translation locale \"{locale}\" is missing keys: {}",
                missing.join(", ")
            ));
        }

        let extra: Vec<&str> = keys.difference(&reference_keys).map(String::as_str).collect();
        if !extra.is_empty() {
            report.warning(format!(
                "Translation locale \"{locale}\" has extra keys: {}",
                extra.join(", ")
            ));
        }
    }

    report
}

fn flatten_keys(messages: &Map<String, Value>) -> BTreeSet<String> {
    fn walk(prefix: &str, map: &Map<String, Value>, out: &mut BTreeSet<String>) {
        for (key, value) in map {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match value {
                Value::Object(nested) => walk(&path, nested, out),
                _ => {
                    out.insert(path);
                }
            }
        }
    }

    let mut out = BTreeSet::new();
    walk("", messages, &mut out);
    out
}

/// Checks the settings schema itself.
#[must_use]
pub fn validate_settings(plugin: &PluginDefinition) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut keys = HashSet::new();

    for field in &plugin.settings_fields {
        if field.key.is_empty() {
            report.error("Settings fields must have a key");
            continue;
        }
        if !keys.insert(field.key.as_str()) {
            report.error(format!("Setting \"{}\" is declared more than once", field.key));
        }
        if field.field_type == crate::SettingFieldType::Select && field.options.is_empty() {
            report.error(format!(
                "Setting \"{}\" of type select must declare options",
                field.key
            ));
        }
        if !field.default_matches_type() {
            report.warning(format!(
                "Setting \"{}\" default value does not match type {}",
                field.key,
                field.field_type.as_str()
            ));
        }
    }

    report
}

/// Confirms the component-stripped manifest survives a JSON round trip.
#[must_use]
pub fn validate_serialization(plugin: &PluginDefinition) -> ValidationReport {
    let mut report = ValidationReport::default();
    let manifest = plugin.manifest();

    let round_trip = serde_json::to_string(&manifest)
        .and_then(|json| serde_json::from_str::<PluginManifest>(&json));
    match round_trip {
        Ok(parsed) if parsed == manifest => {}
        Ok(_) => report.error("Plugin metadata changed during JSON round trip"),
        Err(e) => report.error(format!("Plugin metadata cannot be JSON serialized: {e}")),
    }

    if !plugin.admin_pages.is_empty() {
        report.warning("adminPages contains components - ensure API responses exclude component property");
    }

    report
}

/// Runs every check.
#[must_use]
pub fn validate_plugin_fully(plugin: &PluginDefinition) -> ValidationReport {
    let mut report = validate_plugin(plugin);
    report.merge(validate_serialization(plugin));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, Icon};
    use crate::definition::{ApiRoute, NavigationEntry};
    use crate::http::HttpResponse;
    use crate::settings::{SettingField, SettingFieldType, SettingValue};
    use serde_json::json;

    const PHOTO_ROUTES: [&str; 8] = [
        "",
        "upload",
        "file/[key]",
        "album/[slug]",
        "photo/[photoId]",
        "[id]/photos",
        "[id]/reorder",
        "[id]",
    ];

    fn component() -> Component {
        Component::new("Page", |_| async { Ok(String::new()) })
    }

    fn route(path: &str) -> ApiRoute {
        ApiRoute::new(path).get(|_, _| async { Ok(HttpResponse::empty(200)) })
    }

    fn valid_plugin() -> PluginDefinition {
        PluginDefinition::new("concerts", "Concerts", "Manage concerts", "1.0.0")
            .admin_navigation(NavigationEntry::new(
                "Concerts",
                "/admin/p/concerts",
                Icon::new("calendar", "<svg viewBox=\"0 0 24 24\"></svg>"),
            ))
            .admin_page("", component())
            .admin_page("new", component())
            .admin_page("[id]", component())
            .api_route(route(""))
            .api_route(route("[id]"))
    }

    #[test]
    fn test_valid_plugin() {
        let report = validate_plugin(&valid_plugin());
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let report = validate_plugin(&PluginDefinition::new("", "", "", ""));
        assert_eq!(
            report.errors,
            vec![
                "Plugin must have an id",
                "Plugin must have a name",
                "Plugin must have a description",
                "Plugin must have a version",
            ]
        );
    }

    #[test]
    fn test_invalid_id_format() {
        for id in ["InvalidId", "123plugin", "my_plugin", "-plugin"] {
            let plugin = PluginDefinition::new(id, "Name", "Description", "1.0.0");
            let report = validate_plugin(&plugin);
            assert!(
                report.errors.iter().any(|e| e.contains("must be lowercase")),
                "{id} should be rejected"
            );
        }
        let plugin = PluginDefinition::new("my-plugin-2", "Name", "Description", "1.0.0");
        assert!(validate_plugin(&plugin).is_valid());
    }

    #[test]
    fn test_navigation_checks() {
        let plugin = PluginDefinition::new("concerts", "Concerts", "Events", "1.0.0")
            .admin_navigation(NavigationEntry::new("", "", Icon::new("calendar", "")));
        let report = validate_plugin(&plugin);
        assert!(report.errors.contains(&"Admin navigation must have a name".to_string()));
        assert!(report.errors.contains(&"Admin navigation must have an href".to_string()));
        assert!(report.errors.iter().any(|e| e.contains("icon")));
    }

    #[test]
    fn test_missing_root_admin_page_warns() {
        let plugin = PluginDefinition::new("concerts", "Concerts", "Events", "1.0.0")
            .admin_page("new", component());
        let report = validate_plugin(&plugin);
        assert!(report.is_valid());
        assert!(report.warnings[0].contains("root page"));
    }

    #[test]
    fn test_route_without_handlers() {
        let plugin = valid_plugin().api_route(ApiRoute::new("export"));
        let report = validate_plugin(&plugin);
        assert!(report
            .errors
            .contains(&"API route \"export\" must have at least one HTTP method handler".to_string()));
    }

    #[test]
    fn test_photo_routes_are_correctly_ordered() {
        let report = validate_api_route_ordering(&PHOTO_ROUTES);
        assert!(report.errors.is_empty(), "{:?}", report.errors);
    }

    #[test]
    fn test_swapping_upload_and_dynamic_route() {
        let mut routes = PHOTO_ROUTES;
        routes.swap(1, 7);

        let report = validate_api_route_ordering(&routes);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("\"upload\""));
        assert!(report.errors[0].contains("\"[id]\""));
    }

    #[test]
    fn test_dynamic_before_static_reports_both_paths() {
        let report = validate_api_route_ordering(&["[id]", "upload"]);
        assert_eq!(
            report.errors,
            vec!["API route ordering issue: Static route \"upload\" should come BEFORE dynamic route \"[id]\" to avoid incorrect matching"]
        );
    }

    #[test]
    fn test_dynamic_detection_matches_router() {
        let routes = ["[photo-id]", "upload"];
        let request = split_path("upload");
        let (matched, _) = crate::matcher::find_match(&routes, &request).unwrap();
        assert_eq!(*matched, "[photo-id]");

        let report = validate_api_route_ordering(&routes);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("\"upload\"") && report.errors[0].contains("\"[photo-id]\""));

        let report = validate_api_route_ordering(&["/[id]", "export"]);
        assert_eq!(report.errors.len(), 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_differing_segment_counts_never_conflict() {
        assert!(validate_api_route_ordering(&["[id]/photos", "upload"]).is_valid());
        assert!(validate_api_route_ordering(&["upload", "[id]/photos"]).is_valid());
        assert!(validate_api_route_ordering(&["[id]", "file/[key]"]).is_valid());
        assert!(validate_api_route_ordering(&["[id]", ""]).is_valid());
    }

    #[test]
    fn test_statics_first_yields_no_errors() {
        let routes = ["", "new", "export", "[id]", "archive/[year]", "[id]/edit"];
        assert!(validate_api_route_ordering(&routes).errors.is_empty());
    }

    #[test]
    fn test_full_shadowing_warns() {
        let report = validate_api_route_ordering(&["[id]/photos", "[albumId]/photos"]);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("unreachable"));
    }

    #[test]
    fn test_page_ordering_is_checked() {
        let plugin = PluginDefinition::new("photos", "Photos", "Albums", "1.0.0")
            .public_page("", component())
            .public_page("[slug]", component())
            .public_page("latest", component());
        let report = validate_plugin(&plugin);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Public page ordering issue"));
    }

    #[test]
    fn test_malformed_patterns() {
        assert!(!validate_pattern("[]").is_valid());
        assert!(!validate_pattern("[[id]]").is_valid());
        assert!(!validate_pattern("a[id]").is_valid());
        assert!(!validate_pattern("[id]/photos/[id]").is_valid());
        assert!(validate_pattern("[id]/photos/[photoId]").is_valid());
        assert!(validate_pattern("").is_valid());
    }

    #[test]
    fn test_translation_consistency() {
        let en = json!({ "photos": { "navName": "Photo Albums", "upload": "Upload" } });
        let nl = json!({ "photos": { "navName": "Fotoalbums", "lightbox": "Bekijk" } });
        let plugin = valid_plugin()
            .translations("en", en.as_object().cloned().unwrap())
            .translations("nl", nl.as_object().cloned().unwrap());

        let report = validate_plugin(&plugin);
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![
                "Translation locale \"nl\" is missing keys: photos.upload",
                "Translation locale \"nl\" has extra keys: photos.lightbox",
            ]
        );
    }

    #[test]
    fn test_single_locale_has_no_translation_warnings() {
        let en = json!({ "photos": { "navName": "Photo Albums" } });
        let plugin = valid_plugin().translations("en", en.as_object().cloned().unwrap());
        assert!(validate_translations(&plugin).warnings.is_empty());
    }

    #[test]
    fn test_settings_schema() {
        let plugin = valid_plugin()
            .setting(SettingField::new("layout", "Layout", SettingFieldType::Select))
            .setting(SettingField::new("layout", "Layout again", SettingFieldType::Text))
            .setting(
                SettingField::new("perPage", "Per page", SettingFieldType::Number)
                    .default_value(SettingValue::Text("ten".into())),
            );

        let report = validate_settings(&plugin);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().any(|e| e.contains("must declare options")));
        assert!(report.errors.iter().any(|e| e.contains("more than once")));
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_serialization_round_trip() {
        let report = validate_serialization(&valid_plugin());
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec!["adminPages contains components - ensure API responses exclude component property"]
        );

        let bare = PluginDefinition::new("bare", "Bare", "No pages", "0.1.0");
        assert!(validate_serialization(&bare).warnings.is_empty());
    }

    #[test]
    fn test_validate_fully_combines_reports() {
        let plugin = valid_plugin().api_route(route("upload"));
        let report = validate_plugin_fully(&plugin);
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
        assert!(report.warnings.iter().any(|w| w.starts_with("adminPages")));
    }
}

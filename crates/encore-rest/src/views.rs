//! Minimal HTML shells around plugin-rendered fragments.
//!
//! Components produce HTML fragments; everything here only frames them.

use encore_plugin_api::html::escape;
use encore_plugin_runtime::{AdminNavigationItem, NavigationItem};
use std::fmt::Write;

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{body}\n</body>\n</html>\n",
        escape(title)
    )
}

/// Public page with the site navigation.
pub fn public_page(site_name: &str, nav: &[NavigationItem], content: &str) -> String {
    let mut links = String::new();
    for item in nav {
        let _ = write!(
            links,
            "<a href=\"{}\">{}</a>",
            escape(&item.href),
            escape(&item.name)
        );
    }
    document(
        site_name,
        &format!(
            "<header><a href=\"/\">{}</a><nav>{links}</nav></header>\n<main>{content}</main>",
            escape(site_name)
        ),
    )
}

/// Admin page with the plugin sidebar. Icons are inline SVG.
pub fn admin_page(site_name: &str, nav: &[AdminNavigationItem], content: &str) -> String {
    let mut links = String::new();
    for item in nav {
        let _ = write!(
            links,
            "<li><a href=\"{}\">{}<span>{}</span></a></li>",
            escape(&item.href),
            item.icon.svg(),
            escape(&item.name)
        );
    }
    document(
        &format!("{site_name} admin"),
        &format!("<aside><ul>{links}</ul></aside>\n<main>{content}</main>"),
    )
}

pub fn not_found(site_name: &str) -> String {
    document(site_name, "<main><h1>Page not found</h1></main>")
}

pub fn plugin_not_enabled(site_name: &str, plugin_id: &str) -> String {
    document(
        site_name,
        &format!(
            "<main><h1>Plugin not enabled</h1><p>The plugin \"{}\" is installed but not enabled. \
             Enable it from the plugin settings to use this page.</p></main>",
            escape(plugin_id)
        ),
    )
}

pub fn server_error(site_name: &str) -> String {
    document(site_name, "<main><h1>Something went wrong</h1></main>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_page_lists_navigation() {
        let nav = vec![NavigationItem {
            plugin_id: "concerts".into(),
            name: "Concerten".into(),
            href: "/concerts".into(),
        }];
        let html = public_page("Encore", &nav, "<p>hi</p>");
        assert!(html.contains("<a href=\"/concerts\">Concerten</a>"));
        assert!(html.contains("<main><p>hi</p></main>"));
    }

    #[test]
    fn test_not_enabled_escapes_plugin_id() {
        assert!(plugin_not_enabled("Encore", "<x>").contains("&lt;x&gt;"));
    }
}

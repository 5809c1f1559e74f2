//! Server-rendered admin pages, public page and homepage section.

use crate::i18n::DEFAULT_LOCALE;
use crate::model::Concert;
use crate::store::ConcertStore;
use chrono::{NaiveDate, Utc};
use encore_plugin_api::html::{escape, join_path};
use encore_plugin_api::{Component, PageProps, PluginError, Translator};
use std::fmt::Write;
use std::sync::Arc;

const ADMIN_BASE: &str = "/admin/p/concerts";
const API_BASE: &str = "/api/p/concerts";
const HOMEPAGE_LIMIT: usize = 4;

/// Shared state captured by every component.
#[derive(Debug, Clone)]
pub struct Pages {
    store: Arc<ConcertStore>,
    t: Arc<Translator>,
}

impl Pages {
    pub fn new(store: Arc<ConcertStore>, translator: Translator) -> Self {
        Self {
            store,
            t: Arc::new(translator),
        }
    }

    fn component<F>(&self, name: &'static str, render: F) -> Component
    where
        F: Fn(&Self, &PageProps) -> Result<String, PluginError> + Send + Sync + Copy + 'static,
    {
        let pages = self.clone();
        Component::new(name, move |props: PageProps| {
            let pages = pages.clone();
            async move { render(&pages, &props) }
        })
    }

    pub fn list(&self) -> Component {
        self.component("ConcertListPage", Self::render_list)
    }

    pub fn new_page(&self) -> Component {
        self.component("ConcertNewPage", Self::render_new)
    }

    pub fn edit(&self) -> Component {
        self.component("ConcertEditPage", Self::render_edit)
    }

    pub fn public(&self) -> Component {
        self.component("ConcertPublicPage", Self::render_public)
    }

    pub fn homepage(&self) -> Component {
        self.component("ConcertsHomepageSection", Self::render_homepage)
    }

    fn render_list(&self, props: &PageProps) -> Result<String, PluginError> {
        let locale = locale(props);
        let concerts = self.store.list(false);

        let mut html = format!(
            r#"<div class="concerts-admin"><header><h1>{}</h1><a class="button" href="{ADMIN_BASE}/new">{}</a></header>"#,
            escape(self.t.text(locale, "admin.list")),
            escape(self.t.text(locale, "admin.new")),
        );
        if concerts.is_empty() {
            let _ = write!(html, "<p>{}</p>", escape(self.t.text(locale, "noConcerts")));
        } else {
            html.push_str("<table><tbody>");
            for concert in &concerts {
                let _ = write!(
                    html,
                    r#"<tr><td><a href="{ADMIN_BASE}/{id}">{title}</a></td><td>{venue}, {city}</td><td>{date}</td><td>{status}</td><td><button data-delete="{API_BASE}/{id}">{delete}</button></td></tr>"#,
                    id = escape(&concert.id),
                    title = escape(&concert.title),
                    venue = escape(&concert.venue),
                    city = escape(&concert.city),
                    date = concert.date,
                    status = if concert.published { "published" } else { "draft" },
                    delete = escape(self.t.text(locale, "admin.delete")),
                );
            }
            html.push_str("</tbody></table>");
        }
        html.push_str("</div>");
        Ok(html)
    }

    fn render_new(&self, props: &PageProps) -> Result<String, PluginError> {
        let locale = locale(props);
        Ok(format!(
            "<div class=\"concerts-admin\"><h1>{}</h1>{}</div>",
            escape(self.t.text(locale, "admin.new")),
            self.form(locale, "POST", API_BASE, None),
        ))
    }

    fn render_edit(&self, props: &PageProps) -> Result<String, PluginError> {
        let locale = locale(props);
        let id = props
            .param("id")
            .ok_or_else(|| PluginError::not_found("Concert not found"))?;
        let concert = self
            .store
            .get(id)
            .ok_or_else(|| PluginError::not_found("Concert not found"))?;

        Ok(format!(
            "<div class=\"concerts-admin\"><h1>{}</h1>{}</div>",
            escape(self.t.text(locale, "admin.edit")),
            self.form(locale, "PUT", &format!("{API_BASE}/{}", concert.id), Some(&concert)),
        ))
    }

    fn form(&self, locale: &str, method: &str, action: &str, concert: Option<&Concert>) -> String {
        let value = |f: fn(&Concert) -> String| concert.map(f).unwrap_or_default();
        let mut html = format!(r#"<form class="concert-form" data-method="{method}" data-action="{}">"#, escape(action));
        for (name, current) in [
            ("title", value(|c| c.title.clone())),
            ("venue", value(|c| c.venue.clone())),
            ("city", value(|c| c.city.clone())),
            ("date", value(|c| c.date.to_string())),
            ("time", value(|c| c.time.clone())),
            ("ticketUrl", value(|c| c.ticket_url.clone().unwrap_or_default())),
            ("imageUrl", value(|c| c.image_url.clone().unwrap_or_default())),
        ] {
            let _ = write!(
                html,
                r#"<label>{name}<input name="{name}" value="{}"></label>"#,
                escape(&current)
            );
        }
        let _ = write!(
            html,
            r#"<label>description<textarea name="description">{}</textarea></label><label><input type="checkbox" name="published"{}> published</label><button type="submit">{}</button></form>"#,
            escape(&value(|c| c.description.clone().unwrap_or_default())),
            if concert.is_some_and(|c| c.published) { " checked" } else { "" },
            escape(self.t.text(locale, "admin.save")),
        );
        html
    }

    fn render_public(&self, props: &PageProps) -> Result<String, PluginError> {
        let locale = locale(props);
        let today = Utc::now().date_naive();
        let (upcoming, mut past): (Vec<_>, Vec<_>) =
            self.store.list(true).into_iter().partition(|c| c.is_upcoming(today));
        past.reverse();

        let mut html = format!(
            "<div class=\"concerts\"><h1>{}</h1>",
            escape(self.t.text(locale, "title"))
        );
        for (heading, concerts) in [("upcoming", &upcoming), ("past", &past)] {
            if heading == "past" && concerts.is_empty() {
                continue;
            }
            let _ = write!(html, "<section><h2>{}</h2>", escape(self.t.text(locale, heading)));
            if concerts.is_empty() {
                let _ = write!(html, "<p>{}</p>", escape(self.t.text(locale, "noConcerts")));
            }
            for concert in concerts.iter() {
                html.push_str(&self.card(locale, concert));
            }
            html.push_str("</section>");
        }
        html.push_str("</div>");
        Ok(html)
    }

    fn render_homepage(&self, props: &PageProps) -> Result<String, PluginError> {
        let locale = locale(props);
        let base = props.public_path.as_deref().unwrap_or("/concerts");
        let upcoming = upcoming(&self.store, Utc::now().date_naive());

        let mut html = format!(
            r#"<section class="concerts-home"><header><h2>{}</h2><a href="{}">{} &rarr;</a></header>"#,
            escape(self.t.text(locale, "upcoming")),
            escape(&join_path(base, "")),
            escape(self.t.text(locale, "viewAll")),
        );
        if upcoming.is_empty() {
            let _ = write!(html, "<p>{}</p>", escape(self.t.text(locale, "noConcerts")));
        }
        for concert in &upcoming {
            html.push_str(&self.card(locale, concert));
        }
        html.push_str("</section>");
        Ok(html)
    }

    fn card(&self, locale: &str, concert: &Concert) -> String {
        let mut html = format!(
            r#"<article class="concert"><time datetime="{date}">{date}</time><h3>{}</h3><p>{} &middot; {}</p><p>{}</p>"#,
            escape(&concert.title),
            escape(&concert.venue),
            escape(&concert.city),
            escape(&concert.time),
            date = concert.date.format("%Y-%m-%d"),
        );
        if let Some(description) = &concert.description {
            let _ = write!(html, "<p>{}</p>", escape(description));
        }
        if let Some(url) = &concert.ticket_url {
            let _ = write!(
                html,
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                escape(url),
                escape(self.t.text(locale, "tickets")),
            );
        }
        html.push_str("</article>");
        html
    }
}

/// The next published concerts on or after `today`.
fn upcoming(store: &ConcertStore, today: NaiveDate) -> Vec<Concert> {
    store
        .list(true)
        .into_iter()
        .filter(|c| c.is_upcoming(today))
        .take(HOMEPAGE_LIMIT)
        .collect()
}

fn locale(props: &PageProps) -> &str {
    props.query.get("locale").map_or(DEFAULT_LOCALE, String::as_str)
}

//! Server-rendered album admin, gallery, album view and homepage section.

use crate::i18n::DEFAULT_LOCALE;
use crate::model::{AlbumSummary, AlbumWithPhotos, Photo};
use crate::store::AlbumStore;
use encore_plugin_api::html::{escape, join_path};
use encore_plugin_api::{Component, PageProps, PluginError, Translator};
use std::fmt::Write;
use std::sync::Arc;

const ADMIN_BASE: &str = "/admin/p/photos";
const API_BASE: &str = "/api/p/photos";
const DEFAULT_PUBLIC_PATH: &str = "/photos";
const HOMEPAGE_ALBUMS: usize = 3;
const HOMEPAGE_THUMBNAILS: usize = 4;

#[derive(Debug, Clone)]
pub struct Pages {
    albums: Arc<AlbumStore>,
    t: Arc<Translator>,
}

impl Pages {
    pub fn new(albums: Arc<AlbumStore>, translator: Translator) -> Self {
        Self {
            albums,
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

    pub fn album_list(&self) -> Component {
        self.component("AlbumListPage", Self::render_album_list)
    }

    pub fn album_new(&self) -> Component {
        self.component("AlbumNewPage", Self::render_album_new)
    }

    pub fn album_edit(&self) -> Component {
        self.component("AlbumEditPage", Self::render_album_edit)
    }

    pub fn gallery(&self) -> Component {
        self.component("GalleryPage", Self::render_gallery)
    }

    pub fn album_view(&self) -> Component {
        self.component("AlbumViewPage", Self::render_album_view)
    }

    pub fn homepage(&self) -> Component {
        self.component("PhotosHomepageSection", Self::render_homepage)
    }

    fn render_album_list(&self, props: &PageProps) -> Result<String, PluginError> {
        let locale = locale(props);
        let albums = self.albums.list(false);

        let mut html = format!(
            r#"<div class="photos-admin"><header><h1>{}</h1><a class="button" href="{ADMIN_BASE}/new">{}</a></header>"#,
            escape(self.t.text(locale, "admin.list")),
            escape(self.t.text(locale, "admin.new")),
        );
        if albums.is_empty() {
            let _ = write!(html, "<p>{}</p>", escape(self.t.text(locale, "noAlbums")));
        } else {
            html.push_str("<table><tbody>");
            for album in &albums {
                let _ = write!(
                    html,
                    r#"<tr><td><a href="{ADMIN_BASE}/{id}">{title}</a></td><td>/{slug}</td><td>{count} {photos}</td><td>{status}</td><td><button data-delete="{API_BASE}/{id}">{delete}</button></td></tr>"#,
                    id = escape(&album.id),
                    title = escape(&album.title),
                    slug = escape(&album.slug),
                    count = album.photo_count,
                    photos = escape(self.t.text(locale, "photoCount")),
                    status = if album.published { "published" } else { "draft" },
                    delete = escape(self.t.text(locale, "admin.delete")),
                );
            }
            html.push_str("</tbody></table>");
        }
        html.push_str("</div>");
        Ok(html)
    }

    fn render_album_new(&self, props: &PageProps) -> Result<String, PluginError> {
        let locale = locale(props);
        Ok(format!(
            "<div class=\"photos-admin\"><h1>{}</h1>{}</div>",
            escape(self.t.text(locale, "admin.new")),
            self.album_form(locale, "POST", API_BASE, None),
        ))
    }

    fn render_album_edit(&self, props: &PageProps) -> Result<String, PluginError> {
        let locale = locale(props);
        let album = props
            .param("id")
            .and_then(|id| self.albums.get(id))
            .ok_or_else(|| PluginError::not_found("Album not found"))?;
        let id = escape(&album.album.id);

        let mut html = format!(
            "<div class=\"photos-admin\"><h1>{}</h1>{}",
            escape(self.t.text(locale, "admin.edit")),
            self.album_form(locale, "PUT", &format!("{API_BASE}/{id}"), Some(&album)),
        );
        let _ = write!(
            html,
            r#"<form class="photo-upload" data-action="{API_BASE}/upload?albumId={id}" enctype="application/octet-stream"><input type="file" accept="image/*" multiple><button type="submit">{}</button></form>"#,
            escape(self.t.text(locale, "admin.upload")),
        );
        let _ = write!(html, r#"<ol class="photo-grid" data-reorder="{API_BASE}/{id}/reorder">"#);
        for photo in &album.photos {
            let _ = write!(
                html,
                r#"<li data-photo-id="{}">{}<button data-delete="{API_BASE}/photo/{}">{}</button></li>"#,
                escape(&photo.id),
                thumbnail(photo),
                escape(&photo.id),
                escape(self.t.text(locale, "admin.delete")),
            );
        }
        html.push_str("</ol></div>");
        Ok(html)
    }

    fn album_form(&self, locale: &str, method: &str, action: &str, album: Option<&AlbumWithPhotos>) -> String {
        let album = album.map(|a| &a.album);
        let text = |value: Option<&str>| escape(value.unwrap_or_default());
        format!(
            r#"<form class="album-form" data-method="{method}" data-action="{action}"><label>title<input name="title" value="{title}"></label><label>slug<input name="slug" value="{slug}"></label><label>description<textarea name="description">{description}</textarea></label><label><input type="checkbox" name="published"{checked}> published</label><button type="submit">{save}</button></form>"#,
            action = escape(action),
            title = text(album.map(|a| a.title.as_str())),
            slug = text(album.map(|a| a.slug.as_str())),
            description = text(album.and_then(|a| a.description.as_deref())),
            checked = if album.is_some_and(|a| a.published) { " checked" } else { "" },
            save = escape(self.t.text(locale, "admin.save")),
        )
    }

    fn render_gallery(&self, props: &PageProps) -> Result<String, PluginError> {
        let locale = locale(props);
        let base = public_base(props);
        let albums = self.albums.list(true);

        let mut html = format!(
            "<div class=\"gallery\"><h1>{}</h1>",
            escape(self.t.text(locale, "title"))
        );
        if albums.is_empty() {
            let _ = write!(html, "<p>{}</p>", escape(self.t.text(locale, "noAlbums")));
        }
        for album in &albums {
            html.push_str(&self.album_card(locale, base, album));
        }
        html.push_str("</div>");
        Ok(html)
    }

    fn render_album_view(&self, props: &PageProps) -> Result<String, PluginError> {
        let locale = locale(props);
        let album = props
            .param("slug")
            .and_then(|slug| self.albums.by_slug(slug))
            .filter(|a| a.album.published)
            .ok_or_else(|| PluginError::not_found("Album not found"))?;

        let mut html = format!(
            r#"<div class="album"><a href="{}">&larr; {}</a><h1>{}</h1>"#,
            escape(&join_path(public_base(props), "")),
            escape(self.t.text(locale, "backToGallery")),
            escape(&album.album.title),
        );
        if let Some(description) = &album.album.description {
            let _ = write!(html, "<p>{}</p>", escape(description));
        }
        if album.photos.is_empty() {
            let _ = write!(html, "<p>{}</p>", escape(self.t.text(locale, "noPhotos")));
        } else {
            html.push_str(r#"<div class="lightbox-grid">"#);
            for photo in &album.photos {
                let _ = write!(
                    html,
                    r#"<figure><a href="{}" data-lightbox>{}</a>{}</figure>"#,
                    escape(&photo.url),
                    thumbnail(photo),
                    photo
                        .caption
                        .as_deref()
                        .map(|c| format!("<figcaption>{}</figcaption>", escape(c)))
                        .unwrap_or_default(),
                );
            }
            html.push_str("</div>");
        }
        html.push_str("</div>");
        Ok(html)
    }

    /// Renders nothing when there are no published albums.
    fn render_homepage(&self, props: &PageProps) -> Result<String, PluginError> {
        let albums: Vec<_> = self.albums.list(true).into_iter().take(HOMEPAGE_ALBUMS).collect();
        if albums.is_empty() {
            return Ok(String::new());
        }
        let locale = locale(props);
        let base = public_base(props);

        let mut html = format!(
            r#"<section class="photos-home"><header><h2>{}</h2><a href="{}">{} &rarr;</a></header>"#,
            escape(self.t.text(locale, "recentAlbums")),
            escape(&join_path(base, "")),
            escape(self.t.text(locale, "viewAll")),
        );
        for album in &albums {
            let _ = write!(
                html,
                r#"<a class="album-preview" href="{}"><h3>{}</h3><div class="thumbs">"#,
                escape(&join_path(base, &album.slug)),
                escape(&album.title),
            );
            for photo in self.albums.photos(&album.id).iter().take(HOMEPAGE_THUMBNAILS) {
                html.push_str(&thumbnail(photo));
            }
            html.push_str("</div></a>");
        }
        html.push_str("</section>");
        Ok(html)
    }

    fn album_card(&self, locale: &str, base: &str, album: &AlbumSummary) -> String {
        let cover = album
            .cover_image
            .as_deref()
            .map(|url| format!(r#"<img src="{}" alt="" loading="lazy">"#, escape(url)))
            .unwrap_or_default();
        format!(
            r#"<a class="album-card" href="{}">{cover}<h2>{}</h2><p>{} {}</p></a>"#,
            escape(&join_path(base, &album.slug)),
            escape(&album.title),
            album.photo_count,
            escape(self.t.text(locale, "photoCount")),
        )
    }
}

fn thumbnail(photo: &Photo) -> String {
    let src = photo.thumbnail_url.as_deref().unwrap_or(&photo.url);
    let alt = photo.alt_text.as_deref().or(photo.title.as_deref()).unwrap_or(&photo.filename);
    format!(r#"<img src="{}" alt="{}" loading="lazy">"#, escape(src), escape(alt))
}

fn locale(props: &PageProps) -> &str {
    props.query.get("locale").map_or(DEFAULT_LOCALE, String::as_str)
}

fn public_base(props: &PageProps) -> &str {
    props.public_path.as_deref().unwrap_or(DEFAULT_PUBLIC_PATH)
}

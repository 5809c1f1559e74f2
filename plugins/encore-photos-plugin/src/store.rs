//! In-memory album and photo records.

use crate::model::{
    slugify, Album, AlbumChanges, AlbumSummary, AlbumWithPhotos, NewAlbum, NewPhoto, Photo, PhotoChanges,
};
use chrono::Utc;
use encore_plugin_api::{PluginError, PluginResult};
use parking_lot::RwLock;
use uuid::Uuid;

const SLUG_TAKEN: &str = "An album with this slug already exists";

#[derive(Debug, Default)]
struct Records {
    albums: Vec<Album>,
    photos: Vec<Photo>,
}

impl Records {
    fn album(&self, id: &str) -> Option<&Album> {
        self.albums.iter().find(|a| a.id == id)
    }

    fn slug_taken(&self, slug: &str, except: Option<&str>) -> bool {
        self.albums
            .iter()
            .any(|a| a.slug == slug && Some(a.id.as_str()) != except)
    }

    fn photos_in(&self, album_id: &str) -> Vec<Photo> {
        let mut photos: Vec<_> = self
            .photos
            .iter()
            .filter(|p| p.album_id == album_id)
            .cloned()
            .collect();
        photos.sort_by_key(|p| p.order);
        photos
    }

    fn summary(&self, album: &Album) -> AlbumSummary {
        let photos = self.photos_in(&album.id);
        let cover_image = album
            .cover_photo_id
            .as_ref()
            .and_then(|cover| photos.iter().find(|p| &p.id == cover))
            .or_else(|| photos.first())
            .map(|p| p.url.clone());

        AlbumSummary {
            id: album.id.clone(),
            title: album.title.clone(),
            slug: album.slug.clone(),
            description: album.description.clone(),
            published: album.published,
            photo_count: photos.len(),
            cover_image,
            created_at: album.created_at,
            updated_at: album.updated_at,
        }
    }

    fn with_photos(&self, album: &Album) -> AlbumWithPhotos {
        AlbumWithPhotos {
            album: album.clone(),
            photos: self.photos_in(&album.id),
        }
    }
}

#[derive(Debug, Default)]
pub struct AlbumStore {
    records: RwLock<Records>,
}

impl AlbumStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Albums newest first.
    #[must_use]
    pub fn list(&self, published_only: bool) -> Vec<AlbumSummary> {
        let records = self.records.read();
        let mut albums: Vec<_> = records
            .albums
            .iter()
            .filter(|a| !published_only || a.published)
            .collect();
        albums.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        albums.into_iter().map(|a| records.summary(a)).collect()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<AlbumWithPhotos> {
        let records = self.records.read();
        records.album(id).map(|a| records.with_photos(a))
    }

    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<AlbumWithPhotos> {
        let records = self.records.read();
        records
            .albums
            .iter()
            .find(|a| a.slug == slug)
            .map(|a| records.with_photos(a))
    }

    /// # Errors
    ///
    /// Fails on a missing title or a slug already in use.
    pub fn create(&self, input: NewAlbum) -> PluginResult<Album> {
        if input.title.trim().is_empty() {
            return Err(PluginError::invalid_input("Title is required"));
        }
        let slug = input
            .slug
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&input.title));

        let mut records = self.records.write();
        if records.slug_taken(&slug, None) {
            return Err(PluginError::invalid_input(SLUG_TAKEN));
        }

        let now = Utc::now();
        let album = Album {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            slug,
            description: input.description.filter(|d| !d.is_empty()),
            cover_photo_id: None,
            published: input.published,
            created_at: now,
            updated_at: now,
        };
        records.albums.push(album.clone());
        Ok(album)
    }

    /// # Errors
    ///
    /// Fails when the album does not exist or the new slug is taken.
    pub fn update(&self, id: &str, changes: AlbumChanges) -> PluginResult<Album> {
        let mut records = self.records.write();
        if let Some(slug) = &changes.slug {
            if records.slug_taken(slug, Some(id)) {
                return Err(PluginError::invalid_input(SLUG_TAKEN));
            }
        }

        let album = records
            .albums
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(album_not_found)?;
        if let Some(title) = changes.title {
            album.title = title;
        }
        if let Some(slug) = changes.slug {
            album.slug = slug;
        }
        if let Some(description) = changes.description {
            album.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(cover) = changes.cover_photo_id {
            album.cover_photo_id = Some(cover).filter(|c| !c.is_empty());
        }
        if let Some(published) = changes.published {
            album.published = published;
        }
        album.updated_at = Utc::now();
        Ok(album.clone())
    }

    /// Removes the album and its photos, returning the removed photos so
    /// their files can be released.
    ///
    /// # Errors
    ///
    /// Fails when the album does not exist.
    pub fn delete(&self, id: &str) -> PluginResult<Vec<Photo>> {
        let mut records = self.records.write();
        let before = records.albums.len();
        records.albums.retain(|a| a.id != id);
        if records.albums.len() == before {
            return Err(album_not_found());
        }
        let (removed, kept): (Vec<Photo>, Vec<Photo>) = std::mem::take(&mut records.photos)
            .into_iter()
            .partition(|p| p.album_id == id);
        records.photos = kept;
        Ok(removed)
    }

    /// Photos of an album in display order; empty for an unknown album.
    #[must_use]
    pub fn photos(&self, album_id: &str) -> Vec<Photo> {
        self.records.read().photos_in(album_id)
    }

    /// Appends photos after the album's existing ones.
    ///
    /// # Errors
    ///
    /// Fails when the album does not exist.
    pub fn add_photos(&self, album_id: &str, photos: Vec<NewPhoto>) -> PluginResult<Vec<Photo>> {
        let mut records = self.records.write();
        if records.album(album_id).is_none() {
            return Err(album_not_found());
        }
        let start = records.photos.iter().filter(|p| p.album_id == album_id).count();
        let now = Utc::now();

        let added: Vec<Photo> = photos
            .into_iter()
            .enumerate()
            .map(|(i, photo)| Photo {
                id: Uuid::new_v4().to_string(),
                album_id: album_id.to_string(),
                storage_key: photo.storage_key,
                url: photo.url,
                thumbnail_url: photo.thumbnail_url,
                filename: photo.filename,
                size: photo.size,
                mime_type: photo.mime_type.unwrap_or_else(|| "image/jpeg".to_string()),
                width: photo.width,
                height: photo.height,
                order: start + i,
                title: photo.title,
                caption: photo.caption,
                alt_text: photo.alt_text,
                created_at: now,
            })
            .collect();
        records.photos.extend(added.iter().cloned());
        Ok(added)
    }

    #[must_use]
    pub fn photo(&self, photo_id: &str) -> Option<Photo> {
        self.records.read().photos.iter().find(|p| p.id == photo_id).cloned()
    }

    /// # Errors
    ///
    /// Fails when the photo does not exist.
    pub fn update_photo(&self, photo_id: &str, changes: PhotoChanges) -> PluginResult<Photo> {
        let mut records = self.records.write();
        let photo = records
            .photos
            .iter_mut()
            .find(|p| p.id == photo_id)
            .ok_or_else(photo_not_found)?;
        if changes.title.is_some() {
            photo.title = changes.title;
        }
        if changes.caption.is_some() {
            photo.caption = changes.caption;
        }
        if changes.alt_text.is_some() {
            photo.alt_text = changes.alt_text;
        }
        if let Some(order) = changes.order {
            photo.order = order;
        }
        Ok(photo.clone())
    }

    /// # Errors
    ///
    /// Fails when the photo does not exist.
    pub fn delete_photo(&self, photo_id: &str) -> PluginResult<Photo> {
        let mut records = self.records.write();
        let index = records
            .photos
            .iter()
            .position(|p| p.id == photo_id)
            .ok_or_else(photo_not_found)?;
        let photo = records.photos.remove(index);
        for album in records.albums.iter_mut().filter(|a| a.id == photo.album_id) {
            if album.cover_photo_id.as_deref() == Some(photo_id) {
                album.cover_photo_id = None;
            }
        }
        Ok(photo)
    }

    /// Assigns `order = index` to each listed photo. Applies nothing if any
    /// id does not belong to the album.
    ///
    /// # Errors
    ///
    /// Fails on an unknown album or a foreign photo id.
    pub fn reorder(&self, album_id: &str, photo_ids: &[String]) -> PluginResult<()> {
        let mut records = self.records.write();
        if records.album(album_id).is_none() {
            return Err(album_not_found());
        }
        if let Some(foreign) = photo_ids
            .iter()
            .find(|id| !records.photos.iter().any(|p| &p.id == *id && p.album_id == album_id))
        {
            return Err(PluginError::invalid_input(format!(
                "Photo {foreign} does not belong to this album"
            )));
        }

        for photo in records.photos.iter_mut().filter(|p| p.album_id == album_id) {
            if let Some(index) = photo_ids.iter().position(|id| *id == photo.id) {
                photo.order = index;
            }
        }
        Ok(())
    }
}

fn album_not_found() -> PluginError {
    PluginError::not_found("Album not found")
}

fn photo_not_found() -> PluginError {
    PluginError::not_found("Photo not found")
}

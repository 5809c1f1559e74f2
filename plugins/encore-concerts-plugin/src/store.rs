//! In-memory concert store.

use crate::model::{Concert, ConcertInput};
use chrono::Utc;
use encore_plugin_api::PluginResult;
use parking_lot::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct ConcertStore {
    concerts: RwLock<Vec<Concert>>,
}

impl ConcertStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Concerts ordered by date, earliest first.
    #[must_use]
    pub fn list(&self, published_only: bool) -> Vec<Concert> {
        let mut concerts: Vec<_> = self
            .concerts
            .read()
            .iter()
            .filter(|c| !published_only || c.published)
            .cloned()
            .collect();
        concerts.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        concerts
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Concert> {
        self.concerts.read().iter().find(|c| c.id == id).cloned()
    }

    /// # Errors
    ///
    /// Fails when required fields are missing.
    pub fn create(&self, input: ConcertInput) -> PluginResult<Concert> {
        let (input, date) = input.validated()?;
        let now = Utc::now();
        let concert = Concert {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            venue: input.venue,
            city: input.city,
            date,
            time: input.time,
            description: input.description,
            ticket_url: input.ticket_url,
            image_url: input.image_url,
            published: input.published,
            created_at: now,
            updated_at: now,
        };
        self.concerts.write().push(concert.clone());
        Ok(concert)
    }

    /// Replaces every editable field. Returns `None` for an unknown id.
    ///
    /// # Errors
    ///
    /// Fails when required fields are missing.
    pub fn update(&self, id: &str, input: ConcertInput) -> PluginResult<Option<Concert>> {
        let (input, date) = input.validated()?;
        let mut concerts = self.concerts.write();
        let Some(concert) = concerts.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        concert.title = input.title;
        concert.venue = input.venue;
        concert.city = input.city;
        concert.date = date;
        concert.time = input.time;
        concert.description = input.description;
        concert.ticket_url = input.ticket_url;
        concert.image_url = input.image_url;
        concert.published = input.published;
        concert.updated_at = Utc::now();
        Ok(Some(concert.clone()))
    }

    pub fn delete(&self, id: &str) -> bool {
        let mut concerts = self.concerts.write();
        let before = concerts.len();
        concerts.retain(|c| c.id != id);
        concerts.len() != before
    }
}

use std::sync::Arc;

use crate::defaults;
use crate::domain::{next_id, Comment, NewPhoto, Photo, PhotoPatch};
use crate::store::{keys, load, persist, KeyValueStore};

/// The gallery, newest photo first.
pub struct PhotoDirectory {
    store: Arc<dyn KeyValueStore>,
    photos: Vec<Photo>,
}

impl PhotoDirectory {
    /// Load the gallery. A store with no gallery yet gets the sample photos,
    /// which are saved right away; an unreadable one falls back to them
    /// without overwriting what is stored.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let photos = match load::<Vec<Photo>>(store.as_ref(), keys::PHOTOS) {
            Ok(Some(photos)) => photos,
            Ok(None) => {
                let photos = defaults::photos();
                persist(store.as_ref(), keys::PHOTOS, &photos);
                tracing::info!(count = photos.len(), "seeded sample photos");
                photos
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load photos, showing samples");
                defaults::photos()
            }
        };
        Self { store, photos }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn get(&self, id: i64) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == id)
    }

    /// Insert at the front with a fresh id.
    pub fn add_photo(&mut self, new: NewPhoto) -> Photo {
        let photo = Photo {
            id: next_id(self.photos.iter().map(|p| p.id)),
            url: new.url,
            title: new.title,
            size: new.size,
            date: new.date,
            likes: new.likes.unwrap_or(0),
            comments: new.comments.unwrap_or_default(),
        };
        self.photos.insert(0, photo.clone());
        self.save();
        tracing::debug!(id = photo.id, title = %photo.title, "added photo");
        photo
    }

    /// Returns whether a photo was removed.
    pub fn remove_photo(&mut self, id: i64) -> bool {
        self.remove_photos(&[id]) == 1
    }

    /// Bulk delete with a single write. Returns how many photos were removed.
    pub fn remove_photos(&mut self, ids: &[i64]) -> usize {
        let before = self.photos.len();
        self.photos.retain(|p| !ids.contains(&p.id));
        let removed = before - self.photos.len();
        if removed > 0 {
            self.save();
            tracing::debug!(removed, "removed photos");
        }
        removed
    }

    /// Merge the set fields of `patch` into the photo. Returns false if there
    /// is no such photo.
    pub fn update_photo(&mut self, id: i64, patch: PhotoPatch) -> bool {
        let Some(photo) = self.photos.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        patch.apply(photo);
        self.save();
        true
    }

    /// Add one like. There is no way to take a like back; calling this twice
    /// counts two likes. Returns the new count.
    pub fn toggle_like(&mut self, id: i64) -> Option<u32> {
        let photo = self.photos.iter_mut().find(|p| p.id == id)?;
        photo.likes = photo.likes.saturating_add(1);
        let likes = photo.likes;
        self.save();
        Some(likes)
    }

    /// Append a comment stamped with the current time.
    pub fn add_comment(&mut self, id: i64, text: &str) -> Option<Comment> {
        let photo = self.photos.iter_mut().find(|p| p.id == id)?;
        let comment = Comment {
            id: next_id(photo.comments.iter().map(|c| c.id)),
            text: text.to_string(),
            date: chrono::Utc::now().to_rfc3339(),
        };
        photo.comments.push(comment.clone());
        self.save();
        Some(comment)
    }

    /// The caption is the first comment: rewrite it, or start the thread
    /// with it when there are no comments and the caption is non-empty.
    pub fn set_caption(&mut self, id: i64, caption: &str) -> bool {
        let Some(photo) = self.photos.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        match photo.comments.first_mut() {
            Some(first) => first.text = caption.to_string(),
            None if !caption.is_empty() => photo.comments.push(Comment {
                id: next_id([]),
                text: caption.to_string(),
                date: chrono::Utc::now().to_rfc3339(),
            }),
            None => return true,
        }
        self.save();
        true
    }

    fn save(&self) {
        persist(self.store.as_ref(), keys::PHOTOS, &self.photos);
    }
}

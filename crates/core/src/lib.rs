pub mod config;
pub mod content;
pub mod defaults;
pub mod domain;
pub mod error;
pub mod hasher;
pub mod import;
pub mod photos;
pub mod settings;
pub mod store;
pub mod users;

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use config::AlbumConfig;
use content::ContentDirectory;
use domain::{Session, UserSummary};
use error::{AuthError, Result};
use import::{ImportProgress, UploadDraft};
use photos::PhotoDirectory;
use settings::{NoThemeSink, SettingsStore, ThemeSink};
use store::{KeyValueStore, MemoryStore, SqliteStore};
use users::UserDirectory;

/// Counts shown by `album status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumStats {
    pub total_users: usize,
    pub total_photos: usize,
    pub total_likes: u64,
    pub total_comments: usize,
    pub total_events: usize,
}

/// The main entry point: every directory, built once over one store, plus
/// the current session.
pub struct Album {
    config: AlbumConfig,
    users: UserDirectory,
    photos: PhotoDirectory,
    content: ContentDirectory,
    settings: SettingsStore,
    session: Session,
}

impl Album {
    /// Open or create an album backed by a SQLite file.
    pub fn open(path: &Path, config: AlbumConfig) -> Result<Self> {
        let store = SqliteStore::open(path)?;
        Ok(Self::with_store(Arc::new(store), config, Box::new(NoThemeSink)))
    }

    /// An album that lives only as long as the value (for testing).
    pub fn in_memory(config: AlbumConfig) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), config, Box::new(NoThemeSink))
    }

    /// Load every directory from `store` and restore the persisted session.
    pub fn with_store(
        store: Arc<dyn KeyValueStore>,
        config: AlbumConfig,
        theme_sink: Box<dyn ThemeSink>,
    ) -> Self {
        let users = UserDirectory::load(store.clone(), &config);
        let photos = PhotoDirectory::load(store.clone());
        let content = ContentDirectory::load(store.clone());
        let settings = SettingsStore::load(store, theme_sink);
        let session = users.restore_session();
        Self {
            config,
            users,
            photos,
            content,
            settings,
            session,
        }
    }

    pub fn config(&self) -> &AlbumConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ── Accounts ─────────────────────────────────────────────────────

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn registered_users(&self) -> Vec<UserSummary> {
        self.users.registered_users()
    }

    pub fn register(&mut self, username: &str, password: &str) -> std::result::Result<(), AuthError> {
        self.users.register(username, password)
    }

    /// Sign in, replacing the current session on success.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        match self.users.login(username, password) {
            Some(session) => {
                self.session = session;
                true
            }
            None => false,
        }
    }

    pub fn logout(&mut self) {
        self.session = self.users.logout();
    }

    pub fn reset_password(
        &mut self,
        username: &str,
        new_password: &str,
        master_key: &str,
    ) -> std::result::Result<(), AuthError> {
        self.users.reset_password(username, new_password, master_key)
    }

    /// Requires the current session to belong to an admin.
    pub fn admin_reset_password(
        &mut self,
        username: &str,
        new_password: &str,
        master_key: &str,
    ) -> std::result::Result<(), AuthError> {
        self.users
            .admin_reset_password(&self.session, username, new_password, master_key)
    }

    /// Requires the current session to belong to an admin.
    pub fn admin_create_user(
        &mut self,
        username: &str,
        password: &str,
        master_key: &str,
    ) -> std::result::Result<(), AuthError> {
        self.users
            .admin_create_user(&self.session, username, password, master_key)
    }

    // ── Gallery, content, settings ───────────────────────────────────

    pub fn photos(&self) -> &PhotoDirectory {
        &self.photos
    }

    pub fn photos_mut(&mut self) -> &mut PhotoDirectory {
        &mut self.photos
    }

    pub fn content(&self) -> &ContentDirectory {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut ContentDirectory {
        &mut self.content
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    /// Upload a batch: encode every file in parallel, then add the photos
    /// one by one in draft order, so the gallery order is deterministic.
    /// Files that fail to encode are reported and skipped.
    pub fn import(
        &mut self,
        drafts: Vec<UploadDraft>,
        mut progress_cb: Option<&mut dyn FnMut(ImportProgress)>,
    ) -> (usize, usize) {
        if let Some(ref mut cb) = progress_cb {
            cb(ImportProgress::Start {
                total: drafts.len(),
            });
        }

        let converted: Vec<(UploadDraft, std::result::Result<String, String>)> = drafts
            .into_par_iter()
            .map(|draft| {
                let uri = import::read_data_uri(&draft.path).map_err(|e| e.to_string());
                (draft, uri)
            })
            .collect();

        let mut added = 0usize;
        let mut failed = 0usize;
        for (draft, uri) in converted {
            let path = draft.path.clone();
            match uri {
                Ok(url) => {
                    let photo = self.photos.add_photo(draft.into_new_photo(url));
                    added += 1;
                    if let Some(ref mut cb) = progress_cb {
                        cb(ImportProgress::Added { path, id: photo.id });
                    }
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping upload");
                    failed += 1;
                    if let Some(ref mut cb) = progress_cb {
                        cb(ImportProgress::Failed { path, error });
                    }
                }
            }
        }

        if let Some(ref mut cb) = progress_cb {
            cb(ImportProgress::Complete { added, failed });
        }
        (added, failed)
    }

    pub fn status(&self) -> AlbumStats {
        let photos = self.photos.photos();
        AlbumStats {
            total_users: self.users.users().len(),
            total_photos: photos.len(),
            total_likes: photos.iter().map(|p| u64::from(p.likes)).sum(),
            total_comments: photos.iter().map(|p| p.comments.len()).sum(),
            total_events: self.content.timeline().len(),
        }
    }
}

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ParseValueError;

// ── Users ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account. `password_hash` is a hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Public view of a user, without the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    pub role: Role,
}

/// Who is signed in. Privileged operations take this explicitly.
///
/// The legacy master-key login produces an authenticated session with no
/// `current_user`, which therefore never carries admin rights.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub current_user: Option<User>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(|u| u.role == Role::Admin)
    }

    pub fn username(&self) -> Option<&str> {
        self.current_user.as_ref().map(|u| u.username.as_str())
    }
}

// ── Photos ───────────────────────────────────────────────────────

/// Grid tile shape used by the gallery layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSize {
    #[default]
    Medium,
    Wide,
    Tall,
    Large,
}

impl PhotoSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoSize::Medium => "medium",
            PhotoSize::Wide => "wide",
            PhotoSize::Tall => "tall",
            PhotoSize::Large => "large",
        }
    }

    /// Pick a tile shape from pixel dimensions.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return PhotoSize::Medium;
        }
        let aspect = width as f64 / height as f64;
        if aspect >= 1.5 {
            PhotoSize::Wide
        } else if aspect <= 0.67 {
            PhotoSize::Tall
        } else {
            PhotoSize::Medium
        }
    }
}

impl fmt::Display for PhotoSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhotoSize {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "medium" => Ok(PhotoSize::Medium),
            "wide" => Ok(PhotoSize::Wide),
            "tall" => Ok(PhotoSize::Tall),
            "large" => Ok(PhotoSize::Large),
            _ => Err(ParseValueError {
                kind: "photo size",
                value: s.to_string(),
                expected: "medium, wide, tall, large",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    /// RFC 3339 timestamp.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    /// Data URI or remote URL.
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub size: PhotoSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Input for [`crate::photos::PhotoDirectory::add_photo`]. `likes` and
/// `comments` default to zero and empty when left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPhoto {
    pub url: String,
    pub title: String,
    pub size: PhotoSize,
    pub date: Option<String>,
    pub likes: Option<u32>,
    pub comments: Option<Vec<Comment>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoPatch {
    pub url: Option<String>,
    pub title: Option<String>,
    pub size: Option<PhotoSize>,
    pub date: Option<String>,
    pub comments: Option<Vec<Comment>>,
}

impl PhotoPatch {
    pub(crate) fn apply(self, photo: &mut Photo) {
        if let Some(url) = self.url {
            photo.url = url;
        }
        if let Some(title) = self.title {
            photo.title = title;
        }
        if let Some(size) = self.size {
            photo.size = size;
        }
        if let Some(date) = self.date {
            photo.date = Some(date);
        }
        if let Some(comments) = self.comments {
            photo.comments = comments;
        }
    }
}

// ── Content ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeroPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: i64,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub date: String,
    pub title: String,
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTimelineEvent {
    pub date: String,
    pub title: String,
    pub desc: String,
    pub img: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineEventPatch {
    pub date: Option<String>,
    pub title: Option<String>,
    pub desc: Option<String>,
    pub img: Option<String>,
}

// ── Settings ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(ParseValueError {
                kind: "theme",
                value: s.to_string(),
                expected: "light, dark, system",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridDensity {
    Compact,
    #[default]
    Comfortable,
}

impl GridDensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridDensity::Compact => "compact",
            GridDensity::Comfortable => "comfortable",
        }
    }
}

impl fmt::Display for GridDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridDensity {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(GridDensity::Compact),
            "comfortable" => Ok(GridDensity::Comfortable),
            _ => Err(ParseValueError {
                kind: "grid density",
                value: s.to_string(),
                expected: "compact, comfortable",
            }),
        }
    }
}

/// User preferences. Fields missing from a stored value, or holding a value
/// this build does not understand, take their defaults; the rest are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(deserialize_with = "or_default")]
    pub theme: Theme,
    #[serde(deserialize_with = "or_default")]
    pub grid_density: GridDensity,
    #[serde(deserialize_with = "or_default")]
    pub expert_mode: bool,
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub grid_density: Option<GridDensity>,
    pub expert_mode: Option<bool>,
}

// ── Ids ──────────────────────────────────────────────────────────

/// Allocate a timestamp-derived id (milliseconds since the epoch) that does
/// not collide with any of `taken`.
pub(crate) fn next_id(taken: impl IntoIterator<Item = i64>) -> i64 {
    let taken: HashSet<i64> = taken.into_iter().collect();
    let mut id = chrono::Utc::now().timestamp_millis();
    while taken.contains(&id) {
        id += 1;
    }
    id
}

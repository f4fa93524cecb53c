//! Catalog models
//!
//! Domain models for accounts and videos.

use auth::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. The email is the token subject.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Option<i64>,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new, active account
    pub fn new(email: String, full_name: String, password_hash: String, role: Role) -> Self {
        Self {
            id: None,
            email,
            full_name,
            password_hash,
            role,
            active: true,
            created_at: None,
            updated_at: None,
        }
    }
}

/// A catalog entry pointing at a media file in the video store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<String>,
    pub duration_minutes: Option<i32>,
    /// Identifier of the video file in the media store
    pub src_uuid: String,
    /// Identifier of the poster image in the image store
    pub poster_uuid: Option<String>,
    pub published: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for registering a video whose file is already stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    pub src_uuid: String,
    #[serde(default)]
    pub poster_uuid: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl From<NewVideo> for Video {
    fn from(new: NewVideo) -> Self {
        Self {
            id: None,
            title: new.title,
            description: new.description,
            year: new.year,
            rating: new.rating,
            duration_minutes: new.duration_minutes,
            src_uuid: new.src_uuid,
            poster_uuid: new.poster_uuid,
            published: new.published,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_users: u64,
    pub total_videos: u64,
    pub published_videos: u64,
    pub total_duration_minutes: i64,
}

//! Catalog repository
//!
//! Storage operations for accounts, videos and watchlists.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::Result;
use thiserror::Error;

use crate::models::{Account, Video};

/// Repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Catalog repository trait for storage operations
#[allow(async_fn_in_trait)]
pub trait CatalogRepository: Send + Sync {
    /// Find an account by email
    async fn find_account(&self, email: &str) -> Result<Option<Account>>;

    /// Create a new account; emails are unique
    async fn create_account(&self, account: &Account) -> Result<Account>;

    /// Update an existing account
    async fn update_account(&self, account: &Account) -> Result<Account>;

    /// Count registered accounts
    async fn count_accounts(&self) -> Result<u64>;

    /// Find a video by ID
    async fn find_video(&self, id: i64) -> Result<Option<Video>>;

    /// List all videos ordered by ID
    async fn list_videos(&self) -> Result<Vec<Video>>;

    /// Create a new video entry
    async fn create_video(&self, video: &Video) -> Result<Video>;

    /// Video IDs on an account's watchlist
    async fn watchlist(&self, email: &str) -> Result<Vec<i64>>;

    /// Add a video to a watchlist; returns false if it was already there
    async fn add_to_watchlist(&self, email: &str, video_id: i64) -> Result<bool>;

    /// Remove a video from a watchlist; returns false if it was absent
    async fn remove_from_watchlist(&self, email: &str, video_id: i64) -> Result<bool>;
}

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    videos: Vec<Video>,
    watchlists: HashMap<String, BTreeSet<i64>>,
}

/// In-memory repository for testing and development
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
    next_account_id: AtomicI64,
    next_video_id: AtomicI64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_account_id: AtomicI64::new(1),
            next_video_id: AtomicI64::new(1),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()).into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()).into())
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogRepository for InMemoryRepository {
    async fn find_account(&self, email: &str) -> Result<Option<Account>> {
        let tables = self.read()?;
        Ok(tables.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn create_account(&self, account: &Account) -> Result<Account> {
        let mut tables = self.write()?;
        if tables.accounts.iter().any(|a| a.email == account.email) {
            return Err(RepositoryError::Duplicate(account.email.clone()).into());
        }
        let mut new_account = account.clone();
        new_account.id = Some(self.next_account_id.fetch_add(1, Ordering::SeqCst));
        new_account.created_at = Some(chrono::Utc::now());
        new_account.updated_at = Some(chrono::Utc::now());
        tables.accounts.push(new_account.clone());
        Ok(new_account)
    }

    async fn update_account(&self, account: &Account) -> Result<Account> {
        let mut tables = self.write()?;
        if let Some(existing) = tables.accounts.iter_mut().find(|a| a.email == account.email) {
            existing.full_name = account.full_name.clone();
            existing.password_hash = account.password_hash.clone();
            existing.role = account.role;
            existing.active = account.active;
            existing.updated_at = Some(chrono::Utc::now());
            return Ok(existing.clone());
        }
        Err(RepositoryError::NotFound(format!("Account {}", account.email)).into())
    }

    async fn count_accounts(&self) -> Result<u64> {
        Ok(self.read()?.accounts.len() as u64)
    }

    async fn find_video(&self, id: i64) -> Result<Option<Video>> {
        let tables = self.read()?;
        Ok(tables.videos.iter().find(|v| v.id == Some(id)).cloned())
    }

    async fn list_videos(&self) -> Result<Vec<Video>> {
        Ok(self.read()?.videos.clone())
    }

    async fn create_video(&self, video: &Video) -> Result<Video> {
        let mut tables = self.write()?;
        let mut new_video = video.clone();
        new_video.id = Some(self.next_video_id.fetch_add(1, Ordering::SeqCst));
        new_video.created_at = Some(chrono::Utc::now());
        new_video.updated_at = Some(chrono::Utc::now());
        tables.videos.push(new_video.clone());
        Ok(new_video)
    }

    async fn watchlist(&self, email: &str) -> Result<Vec<i64>> {
        let tables = self.read()?;
        Ok(tables
            .watchlists
            .get(email)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn add_to_watchlist(&self, email: &str, video_id: i64) -> Result<bool> {
        let mut tables = self.write()?;
        Ok(tables
            .watchlists
            .entry(email.to_string())
            .or_default()
            .insert(video_id))
    }

    async fn remove_from_watchlist(&self, email: &str, video_id: i64) -> Result<bool> {
        let mut tables = self.write()?;
        Ok(tables
            .watchlists
            .get_mut(email)
            .map(|ids| ids.remove(&video_id))
            .unwrap_or(false))
    }
}

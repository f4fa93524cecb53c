//! Catalog service
//!
//! Business logic for accounts, videos and watchlists. Every per-user
//! operation takes the subject of the caller's resolved identity.

use auth::Role;
use error::{AppError, AuthError};
use thiserror::Error;

use crate::models::{Account, CatalogStats, NewVideo, Video};
use crate::password::{hash_password, verify_password};
use crate::repository::{CatalogRepository, InMemoryRepository, RepositoryError};

/// Service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Email already exists: {0}")]
    EmailTaken(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Video not found: {0}")]
    VideoNotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::EmailTaken(_) => AppError::Conflict(err.to_string()),
            ServiceError::InvalidCredentials => AppError::Auth(AuthError::InvalidCredentials),
            ServiceError::AccountDeactivated => AppError::Auth(AuthError::AccountDeactivated),
            ServiceError::AccountNotFound(_) | ServiceError::VideoNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::RepositoryError(msg) => AppError::Internal(msg),
        }
    }
}

fn repo_err(e: anyhow::Error) -> ServiceError {
    ServiceError::RepositoryError(e.to_string())
}

/// Catalog service for business operations
pub struct CatalogService {
    repository: InMemoryRepository,
}

impl CatalogService {
    /// Create a new catalog service with in-memory repository
    pub fn new() -> Self {
        Self {
            repository: InMemoryRepository::new(),
        }
    }

    /// Register a new account
    pub async fn register(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, ServiceError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ServiceError::Validation(format!("invalid email: {email:?}")));
        }
        if password.is_empty() {
            return Err(ServiceError::Validation("password must not be empty".to_string()));
        }

        if self
            .repository
            .find_account(email)
            .await
            .map_err(repo_err)?
            .is_some()
        {
            return Err(ServiceError::EmailTaken(email.to_string()));
        }

        let account = Account::new(
            email.to_string(),
            full_name.trim().to_string(),
            hash_password(password),
            role,
        );
        // The lookup above is advisory; a concurrent registration is caught here.
        let created = self
            .repository
            .create_account(&account)
            .await
            .map_err(|e| match e.downcast_ref::<RepositoryError>() {
                Some(RepositoryError::Duplicate(_)) => ServiceError::EmailTaken(email.to_string()),
                _ => repo_err(e),
            })?;
        tracing::info!(email = %created.email, role = %created.role, "Account registered");
        Ok(created)
    }

    /// Check credentials and return the account they belong to
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, ServiceError> {
        let account = self
            .repository
            .find_account(email.trim())
            .await
            .map_err(repo_err)?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        if !account.active {
            return Err(ServiceError::AccountDeactivated);
        }

        Ok(account)
    }

    /// Change the password of the calling account
    pub async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        if new_password.is_empty() {
            return Err(ServiceError::Validation("password must not be empty".to_string()));
        }

        let mut account = self.authenticate(email, current_password).await?;
        account.password_hash = hash_password(new_password);
        self.repository.update_account(&account).await.map_err(repo_err)?;
        tracing::info!(email = %account.email, "Password changed");
        Ok(())
    }

    /// Create the bootstrap admin account unless the email is already taken
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), ServiceError> {
        match self.register(email, "Administrator", password, Role::Admin).await {
            Ok(_) => Ok(()),
            Err(ServiceError::EmailTaken(_)) => {
                tracing::debug!(email, "Bootstrap admin already present");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Deactivate or reactivate an account
    pub async fn set_active(&self, email: &str, active: bool) -> Result<(), ServiceError> {
        let mut account = self
            .repository
            .find_account(email)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| ServiceError::AccountNotFound(email.to_string()))?;
        account.active = active;
        self.repository.update_account(&account).await.map_err(repo_err)?;
        Ok(())
    }

    /// List videos; non-admin callers only see published ones
    pub async fn list_videos(&self, include_unpublished: bool) -> Result<Vec<Video>, ServiceError> {
        let videos = self.repository.list_videos().await.map_err(repo_err)?;
        Ok(videos
            .into_iter()
            .filter(|v| include_unpublished || v.published)
            .collect())
    }

    /// Get a single video. Unpublished videos are reported as missing unless
    /// `include_unpublished` is set.
    pub async fn get_video(&self, id: i64, include_unpublished: bool) -> Result<Video, ServiceError> {
        self.repository
            .find_video(id)
            .await
            .map_err(repo_err)?
            .filter(|v| include_unpublished || v.published)
            .ok_or(ServiceError::VideoNotFound(id))
    }

    /// Register a video whose file is already in the media store
    pub async fn create_video(&self, new: NewVideo) -> Result<Video, ServiceError> {
        if new.title.trim().is_empty() {
            return Err(ServiceError::Validation("title must not be empty".to_string()));
        }
        if new.src_uuid.trim().is_empty() {
            return Err(ServiceError::Validation("srcUuid must not be empty".to_string()));
        }

        let video = self
            .repository
            .create_video(&Video::from(new))
            .await
            .map_err(repo_err)?;
        tracing::info!(id = ?video.id, src = %video.src_uuid, "Video registered");
        Ok(video)
    }

    /// Videos on the caller's watchlist, under the same visibility rule as
    /// [`Self::list_videos`]
    pub async fn watchlist(
        &self,
        email: &str,
        include_unpublished: bool,
    ) -> Result<Vec<Video>, ServiceError> {
        let ids = self.repository.watchlist(email).await.map_err(repo_err)?;
        let mut videos = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(video) = self.repository.find_video(id).await.map_err(repo_err)? {
                if include_unpublished || video.published {
                    videos.push(video);
                }
            }
        }
        Ok(videos)
    }

    /// Add a video the caller can see to their watchlist
    pub async fn add_to_watchlist(
        &self,
        email: &str,
        video_id: i64,
        include_unpublished: bool,
    ) -> Result<(), ServiceError> {
        self.get_video(video_id, include_unpublished).await?;
        self.repository
            .add_to_watchlist(email, video_id)
            .await
            .map_err(repo_err)?;
        Ok(())
    }

    /// Remove a video from the caller's watchlist
    pub async fn remove_from_watchlist(&self, email: &str, video_id: i64) -> Result<(), ServiceError> {
        let removed = self
            .repository
            .remove_from_watchlist(email, video_id)
            .await
            .map_err(repo_err)?;
        if !removed {
            return Err(ServiceError::VideoNotFound(video_id));
        }
        Ok(())
    }

    /// Catalog-wide counters
    pub async fn stats(&self) -> Result<CatalogStats, ServiceError> {
        let videos = self.repository.list_videos().await.map_err(repo_err)?;
        Ok(CatalogStats {
            total_users: self.repository.count_accounts().await.map_err(repo_err)?,
            total_videos: videos.len() as u64,
            published_videos: videos.iter().filter(|v| v.published).count() as u64,
            total_duration_minutes: videos
                .iter()
                .filter_map(|v| v.duration_minutes)
                .map(i64::from)
                .sum(),
        })
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_video(title: &str, published: bool) -> NewVideo {
        NewVideo {
            title: title.to_string(),
            description: None,
            year: Some(2024),
            rating: None,
            duration_minutes: Some(100),
            src_uuid: format!("{title}.mp4"),
            poster_uuid: None,
            published,
        }
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let service = CatalogService::new();
        service
            .register("ann@example.com", "Ann", "pw", Role::User)
            .await
            .unwrap();

        let account = service.authenticate("ann@example.com", "pw").await.unwrap();
        assert_eq!(account.role, Role::User);

        assert!(matches!(
            service.authenticate("ann@example.com", "wrong").await,
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            service.authenticate("bob@example.com", "pw").await,
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let service = CatalogService::new();
        service.register("ann@example.com", "Ann", "pw", Role::User).await.unwrap();
        let result = service.register("ann@example.com", "Ann", "pw", Role::User).await;
        assert!(matches!(result, Err(ServiceError::EmailTaken(_))));
    }

    #[tokio::test]
    async fn test_deactivated_account_cannot_log_in() {
        let service = CatalogService::new();
        service.register("ann@example.com", "Ann", "pw", Role::User).await.unwrap();
        service.set_active("ann@example.com", false).await.unwrap();
        assert!(matches!(
            service.authenticate("ann@example.com", "pw").await,
            Err(ServiceError::AccountDeactivated)
        ));
    }

    #[tokio::test]
    async fn test_change_password() {
        let service = CatalogService::new();
        service.register("ann@example.com", "Ann", "old", Role::User).await.unwrap();
        service.change_password("ann@example.com", "old", "new").await.unwrap();
        assert!(service.authenticate("ann@example.com", "old").await.is_err());
        assert!(service.authenticate("ann@example.com", "new").await.is_ok());
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let service = CatalogService::new();
        service.ensure_admin("root@example.com", "pw").await.unwrap();
        service.ensure_admin("root@example.com", "pw").await.unwrap();
        let account = service.authenticate("root@example.com", "pw").await.unwrap();
        assert_eq!(account.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_unpublished_videos_are_hidden() {
        let service = CatalogService::new();
        service.create_video(new_video("live", true)).await.unwrap();
        service.create_video(new_video("draft", false)).await.unwrap();

        assert_eq!(service.list_videos(false).await.unwrap().len(), 1);
        assert_eq!(service.list_videos(true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_watchlist_flow() {
        let service = CatalogService::new();
        let video = service.create_video(new_video("live", true)).await.unwrap();
        let id = video.id.unwrap();

        service.add_to_watchlist("ann@example.com", id, false).await.unwrap();
        let list = service.watchlist("ann@example.com", false).await.unwrap();
        assert_eq!(list.len(), 1);
        assert!(service.watchlist("bob@example.com", false).await.unwrap().is_empty());

        assert!(matches!(
            service.add_to_watchlist("ann@example.com", 999, false).await,
            Err(ServiceError::VideoNotFound(999))
        ));

        service.remove_from_watchlist("ann@example.com", id).await.unwrap();
        assert!(service.watchlist("ann@example.com", false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_watchlist_hides_unpublished_videos() {
        let service = CatalogService::new();
        let draft = service.create_video(new_video("draft", false)).await.unwrap();
        let id = draft.id.unwrap();

        assert!(matches!(
            service.add_to_watchlist("ann@example.com", id, false).await,
            Err(ServiceError::VideoNotFound(_))
        ));
        assert!(matches!(
            service.get_video(id, false).await,
            Err(ServiceError::VideoNotFound(_))
        ));

        service.add_to_watchlist("root@example.com", id, true).await.unwrap();
        assert_eq!(service.watchlist("root@example.com", true).await.unwrap().len(), 1);
        assert!(service.watchlist("root@example.com", false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let service = CatalogService::new();
        service.register("ann@example.com", "Ann", "pw", Role::User).await.unwrap();
        service.create_video(new_video("live", true)).await.unwrap();
        service.create_video(new_video("draft", false)).await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_videos, 2);
        assert_eq!(stats.published_videos, 1);
        assert_eq!(stats.total_duration_minutes, 200);
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            AppError::from(ServiceError::InvalidCredentials),
            AppError::Auth(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            AppError::from(ServiceError::EmailTaken("x".to_string())),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(ServiceError::VideoNotFound(1)),
            AppError::NotFound(_)
        ));
    }
}

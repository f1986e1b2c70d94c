use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use hayah_core::{
    is_valid_uf, CookieJar, DashboardData, HayahError, Profile, ProfileApi, ProfileUpdate,
};
use hayah_core::config::CacheConfig;
use hayah_registration::rules::{format_phone, is_valid_birth_date, is_valid_phone};
use hayah_storage::Storage;

use crate::image::{check_image_size, image_extension};

const PROFILE_KEY: &str = "profile";
const DASHBOARD_KEY: &str = "dashboard";

/// Normalise and check a profile edit before it leaves the machine
pub fn validate_update(update: &ProfileUpdate) -> Result<ProfileUpdate, HayahError> {
    if update.is_empty() {
        return Err(HayahError::Validation("Nothing to update".to_string()));
    }

    let mut clean = update.clone();
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(HayahError::Validation("Name cannot be empty".to_string()));
        }
        clean.name = Some(name.trim().to_string());
    }
    if let Some(phone) = &update.phone {
        let masked = format_phone(phone);
        if !is_valid_phone(&masked, "BR") {
            return Err(HayahError::Validation("Invalid phone number".to_string()));
        }
        clean.phone = Some(masked);
    }
    if let Some(date) = &update.birth_date {
        if !is_valid_birth_date(date.trim()) {
            return Err(HayahError::Validation("Invalid birth date".to_string()));
        }
        clean.birth_date = Some(date.trim().to_string());
    }
    if let Some(state) = &update.state {
        if !is_valid_uf(state.trim()) {
            return Err(HayahError::Validation("Unknown state".to_string()));
        }
        clean.state = Some(state.trim().to_uppercase());
    }
    Ok(clean)
}

/// Profile page and dashboard, backed by the API and a local
/// freshness-stamped cache
pub struct ProfileService {
    api: Arc<dyn ProfileApi>,
    storage: Storage,
    jar: CookieJar,
    profile_freshness: chrono::Duration,
    dashboard_freshness: chrono::Duration,
}

impl ProfileService {
    pub fn new(api: Arc<dyn ProfileApi>, storage: Storage, jar: CookieJar, cache: &CacheConfig) -> Self {
        Self {
            api,
            storage,
            jar,
            profile_freshness: chrono::Duration::minutes(cache.profile_freshness_minutes),
            dashboard_freshness: chrono::Duration::minutes(cache.dashboard_freshness_minutes),
        }
    }

    fn token(&self) -> Result<String, HayahError> {
        self.jar.token().ok_or(HayahError::Unauthorized)
    }

    /// A 401 means the stored session is dead: drop it along with the cache
    async fn guard<T>(&self, result: Result<T, HayahError>) -> Result<T, HayahError> {
        match result {
            Err(e) if e.status() == Some(401) => {
                warn!("Session rejected by the backend, logging out");
                self.jar.clear();
                self.storage.save_cookies(&self.jar).await?;
                self.storage.cache_clear().await?;
                Err(HayahError::Unauthorized)
            }
            other => other,
        }
    }

    pub async fn profile(&self, refresh: bool) -> Result<Profile, HayahError> {
        let token = self.token()?;

        if !refresh {
            if let Some(cached) = self
                .storage
                .cache_get::<Profile>(PROFILE_KEY, self.profile_freshness)
                .await?
            {
                debug!("Using cached profile");
                return Ok(cached);
            }
        }

        let profile = self.guard(self.api.get_profile(&token).await).await?;
        self.storage.cache_put(PROFILE_KEY, &profile).await?;
        Ok(profile)
    }

    pub async fn update(&self, update: &ProfileUpdate) -> Result<Profile, HayahError> {
        let update = validate_update(update)?;
        let token = self.token()?;

        let profile = self
            .guard(self.api.update_profile(&token, &update).await)
            .await?;
        info!("Profile updated");
        self.storage.cache_put(PROFILE_KEY, &profile).await?;
        Ok(profile)
    }

    pub async fn upload_image(&self, path: &Path) -> Result<Profile, HayahError> {
        image_extension(path)?;
        let metadata = tokio::fs::metadata(path).await?;
        check_image_size(metadata.len())?;

        let token = self.token()?;
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        info!("Uploading profile image {} ({} bytes)", file_name, bytes.len());
        let profile = self
            .guard(self.api.upload_image(&token, &file_name, bytes).await)
            .await?;
        self.storage.cache_remove(PROFILE_KEY).await?;
        Ok(profile)
    }

    pub async fn delete_image(&self) -> Result<String, HayahError> {
        let token = self.token()?;
        let reply = self.guard(self.api.delete_image(&token).await).await?;
        self.storage.cache_remove(PROFILE_KEY).await?;
        Ok(reply.message)
    }

    pub async fn dashboard(&self, refresh: bool) -> Result<DashboardData, HayahError> {
        let token = self.token()?;

        if !refresh {
            if let Some(cached) = self
                .storage
                .cache_get::<DashboardData>(DASHBOARD_KEY, self.dashboard_freshness)
                .await?
            {
                debug!("Using cached dashboard");
                return Ok(cached);
            }
        }

        let data = self.guard(self.api.dashboard(&token).await).await?;
        self.storage.cache_put(DASHBOARD_KEY, &data).await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use hayah_core::{ApiMessage, AuthSession, UserIdentity};

    #[derive(Default)]
    struct FakeProfiles {
        fetches: AtomicUsize,
        dashboards: AtomicUsize,
        uploads: AtomicUsize,
        expired: bool,
    }

    impl FakeProfiles {
        fn reject_expired(&self) -> Result<(), HayahError> {
            if self.expired {
                return Err(HayahError::Api {
                    status: 401,
                    message: "Token expired".into(),
                });
            }
            Ok(())
        }

        fn profile(name: &str) -> Profile {
            Profile {
                id: "7".into(),
                name: name.into(),
                email: "a@b.co".into(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ProfileApi for FakeProfiles {
        async fn get_profile(&self, token: &str) -> Result<Profile, HayahError> {
            assert_eq!(token, "tok-1");
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.reject_expired()?;
            Ok(Self::profile("Ana"))
        }

        async fn update_profile(&self, _token: &str, update: &ProfileUpdate) -> Result<Profile, HayahError> {
            self.reject_expired()?;
            let mut profile = Self::profile("Ana");
            if let Some(name) = &update.name {
                profile.name = name.clone();
            }
            if let Some(phone) = &update.phone {
                profile.phone = phone.clone();
            }
            Ok(profile)
        }

        async fn upload_image(&self, _token: &str, file_name: &str, bytes: Vec<u8>) -> Result<Profile, HayahError> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            let mut profile = Self::profile("Ana");
            profile.image_url = Some(format!("https://cdn.example/{}?{}", file_name, bytes.len()));
            Ok(profile)
        }

        async fn delete_image(&self, _token: &str) -> Result<ApiMessage, HayahError> {
            Ok(ApiMessage {
                message: "Image removed".into(),
            })
        }

        async fn dashboard(&self, _token: &str) -> Result<DashboardData, HayahError> {
            self.dashboards.fetch_add(1, Ordering::SeqCst);
            self.reject_expired()?;
            Ok(DashboardData {
                level: 2,
                xp: 150,
                next_level_xp: 300,
                ..Default::default()
            })
        }
    }

    async fn service(api: Arc<FakeProfiles>, dir: &Path) -> ProfileService {
        let storage = Storage::open(dir).await.unwrap();
        let jar = CookieJar::default();
        jar.set_session(&AuthSession {
            token: "tok-1".into(),
            user: UserIdentity {
                id: "7".into(),
                name: "Ana".into(),
                email: "a@b.co".into(),
            },
        });
        ProfileService::new(api, storage, jar, &CacheConfig::default())
    }

    #[test]
    fn test_validate_update() {
        assert!(validate_update(&ProfileUpdate::default()).is_err());

        let blank = ProfileUpdate {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(validate_update(&blank).is_err());

        let raw = ProfileUpdate {
            phone: Some("11987654321".into()),
            state: Some("sp".into()),
            ..Default::default()
        };
        let clean = validate_update(&raw).unwrap();
        assert_eq!(clean.phone.as_deref(), Some("(11) 98765-4321"));
        assert_eq!(clean.state.as_deref(), Some("SP"));

        let bad_date = ProfileUpdate {
            birth_date: Some("2999-01-01".into()),
            ..Default::default()
        };
        assert!(validate_update(&bad_date).is_err());

        let padded_date = ProfileUpdate {
            birth_date: Some(" 1990-05-17 ".into()),
            ..Default::default()
        };
        let clean = validate_update(&padded_date).unwrap();
        assert_eq!(clean.birth_date.as_deref(), Some("1990-05-17"));
    }

    #[tokio::test]
    async fn test_profile_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeProfiles::default());
        let svc = service(api.clone(), dir.path()).await;

        assert_eq!(svc.profile(false).await.unwrap().name, "Ana");
        assert_eq!(svc.profile(false).await.unwrap().name, "Ana");
        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);

        svc.profile(true).await.unwrap();
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_cache() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeProfiles::default());
        let svc = service(api.clone(), dir.path()).await;

        let update = ProfileUpdate {
            name: Some(" Ana Souza ".into()),
            ..Default::default()
        };
        assert_eq!(svc.update(&update).await.unwrap().name, "Ana Souza");
        assert_eq!(svc.profile(false).await.unwrap().name, "Ana Souza");
        assert_eq!(api.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dashboard_cache() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeProfiles::default());
        let svc = service(api.clone(), dir.path()).await;

        let data = svc.dashboard(false).await.unwrap();
        assert_eq!(data.level, 2);
        assert!((data.level_progress() - 0.5).abs() < f64::EPSILON);
        svc.dashboard(false).await.unwrap();
        assert_eq!(api.dashboards.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_image_upload_checks_file() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeProfiles::default());
        let svc = service(api.clone(), dir.path()).await;

        let gif = dir.path().join("me.gif");
        tokio::fs::write(&gif, b"GIF89a").await.unwrap();
        assert!(matches!(
            svc.upload_image(&gif).await,
            Err(HayahError::Validation(_))
        ));

        let png = dir.path().join("me.png");
        tokio::fs::write(&png, vec![0u8; 64]).await.unwrap();
        svc.profile(false).await.unwrap();
        let profile = svc.upload_image(&png).await.unwrap();
        assert_eq!(profile.image_url.as_deref(), Some("https://cdn.example/me.png?64"));
        assert_eq!(api.uploads.load(Ordering::SeqCst), 1);

        // cache was invalidated
        svc.profile(false).await.unwrap();
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);

        assert_eq!(svc.delete_image().await.unwrap(), "Image removed");
    }

    #[tokio::test]
    async fn test_expired_session_logs_out() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeProfiles {
            expired: true,
            ..Default::default()
        });
        let svc = service(api, dir.path()).await;

        assert!(matches!(svc.profile(true).await, Err(HayahError::Unauthorized)));
        assert!(matches!(svc.dashboard(true).await, Err(HayahError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_requires_login() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).await.unwrap();
        let svc = ProfileService::new(
            Arc::new(FakeProfiles::default()),
            storage,
            CookieJar::default(),
            &CacheConfig::default(),
        );
        assert!(matches!(svc.profile(false).await, Err(HayahError::Unauthorized)));
    }
}

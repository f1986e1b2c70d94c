pub mod account;
pub mod dashboard;
pub mod locations;
pub mod profile;
pub mod register;

use std::sync::Arc;

use anyhow::Result;
use hayah_api::BackendClient;
use hayah_core::config::AppConfig;
use hayah_core::CookieJar;
use hayah_dashboard::ProfileService;
use hayah_registration::{Notice, NoticeLevel, RegistrationConfig};
use hayah_storage::Storage;

/// Everything a command needs: config, local storage, the session jar and the backend
pub struct AppContext {
    pub config: AppConfig,
    pub storage: Storage,
    pub jar: CookieJar,
    pub backend: Arc<BackendClient>,
}

impl AppContext {
    pub async fn open(config: AppConfig) -> Result<Self> {
        let storage = Storage::open(&config.general.data_dir).await?;
        let jar = CookieJar::new(config.session.cookie_days);
        storage.load_cookies(&jar).await?;

        let backend = Arc::new(BackendClient::new(
            &config.api.base_url,
            config.api.request_timeout_seconds,
        )?);

        Ok(Self {
            config,
            storage,
            jar,
            backend,
        })
    }

    pub fn registration_config(&self) -> Result<RegistrationConfig> {
        Ok(RegistrationConfig::try_from(&self.config.wizard)?)
    }

    pub fn profile_service(&self) -> ProfileService {
        ProfileService::new(
            self.backend.clone(),
            self.storage.clone(),
            self.jar.clone(),
            &self.config.cache,
        )
    }

    pub async fn save_session(&self) -> Result<()> {
        self.storage.save_cookies(&self.jar).await
    }
}

pub fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        let marker = match notice.level {
            NoticeLevel::Success => "✓",
            NoticeLevel::Error => "✗",
        };
        println!("{} {}", marker, notice.message);
    }
}

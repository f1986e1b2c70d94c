use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub locations: LocationsConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    /// Directory holding `cookies.json` and `cache.json`
    pub data_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Unset means the client waits for the backend indefinitely.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationsConfig {
    #[serde(default = "default_locations_url")]
    pub base_url: String,
}

impl Default for LocationsConfig {
    fn default() -> Self {
        Self { base_url: default_locations_url() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_days")]
    pub cookie_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { cookie_days: default_cookie_days() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_profile_freshness")]
    pub profile_freshness_minutes: i64,
    #[serde(default = "default_dashboard_freshness")]
    pub dashboard_freshness_minutes: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            profile_freshness_minutes: default_profile_freshness(),
            dashboard_freshness_minutes: default_dashboard_freshness(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WizardConfig {
    /// "legacy" (8 steps) or "move" (3 steps)
    #[serde(default = "default_flow")]
    pub flow: String,
    /// Check the email format before asking the backend whether it exists.
    #[serde(default)]
    pub email_format_first: bool,
    #[serde(default = "default_resend_seconds")]
    pub recovery_resend_seconds: u64,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            flow: default_flow(),
            email_format_first: false,
            recovery_resend_seconds: default_resend_seconds(),
        }
    }
}

fn default_locations_url() -> String { "https://servicodados.ibge.gov.br/api/v1/localidades".to_string() }
fn default_cookie_days() -> i64 { 7 }
fn default_profile_freshness() -> i64 { 5 }
fn default_dashboard_freshness() -> i64 { 10 }
fn default_flow() -> String { "legacy".to_string() }
fn default_resend_seconds() -> u64 { 60 }

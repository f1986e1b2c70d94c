use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::HayahError;

/// The platform backend: account creation, login and recovery
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn check_email(&self, email: &str) -> Result<EmailAvailability, HayahError>;

    /// `payload` is the full registration form, minus the password confirmation.
    async fn register(&self, payload: &serde_json::Value) -> Result<AuthSession, HayahError>;

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, HayahError>;

    async fn send_recovery_code(&self, email: &str) -> Result<ApiMessage, HayahError>;

    async fn verify_recovery_code(&self, email: &str, code: &str) -> Result<ApiMessage, HayahError>;

    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        password: &str,
    ) -> Result<ApiMessage, HayahError>;
}

/// Authenticated profile and dashboard endpoints
#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn get_profile(&self, token: &str) -> Result<Profile, HayahError>;
    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<Profile, HayahError>;
    async fn upload_image(
        &self,
        token: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Profile, HayahError>;
    async fn delete_image(&self, token: &str) -> Result<ApiMessage, HayahError>;
    async fn dashboard(&self, token: &str) -> Result<DashboardData, HayahError>;
}

/// Third-party municipality lookup used by the city selector
#[async_trait]
pub trait LocationApi: Send + Sync {
    async fn municipalities(&self, uf: &str) -> Result<Vec<Municipality>, HayahError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserIdentity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAvailability {
    pub exists: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Partial profile edit; only the fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub next_level_xp: u64,
    #[serde(default)]
    pub missions: Vec<Mission>,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

impl DashboardData {
    /// Progress towards the next level, 0.0..=1.0
    pub fn level_progress(&self) -> f64 {
        if self.next_level_xp == 0 {
            return 0.0;
        }
        (self.xp as f64 / self.next_level_xp as f64).min(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub xp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub earned_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub id: u64,
    #[serde(alias = "nome")]
    pub name: String,
}

/// The 27 Brazilian federative units (UF code, name)
pub const BRAZIL_STATES: &[(&str, &str)] = &[
    ("AC", "Acre"),
    ("AL", "Alagoas"),
    ("AP", "Amapá"),
    ("AM", "Amazonas"),
    ("BA", "Bahia"),
    ("CE", "Ceará"),
    ("DF", "Distrito Federal"),
    ("ES", "Espírito Santo"),
    ("GO", "Goiás"),
    ("MA", "Maranhão"),
    ("MT", "Mato Grosso"),
    ("MS", "Mato Grosso do Sul"),
    ("MG", "Minas Gerais"),
    ("PA", "Pará"),
    ("PB", "Paraíba"),
    ("PR", "Paraná"),
    ("PE", "Pernambuco"),
    ("PI", "Piauí"),
    ("RJ", "Rio de Janeiro"),
    ("RN", "Rio Grande do Norte"),
    ("RS", "Rio Grande do Sul"),
    ("RO", "Rondônia"),
    ("RR", "Roraima"),
    ("SC", "Santa Catarina"),
    ("SP", "São Paulo"),
    ("SE", "Sergipe"),
    ("TO", "Tocantins"),
];

pub fn is_valid_uf(uf: &str) -> bool {
    BRAZIL_STATES.iter().any(|(code, _)| code.eq_ignore_ascii_case(uf))
}

// Backends disagree on whether ids are numbers or strings
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_accepts_numeric_user_id() {
        let session: AuthSession = serde_json::from_str(
            r#"{"token":"abc","user":{"id":42,"name":"Ana","email":"ana@example.com"}}"#,
        )
        .unwrap();
        assert_eq!(session.user.id, "42");
        assert_eq!(session.user.name, "Ana");
    }

    #[test]
    fn test_municipality_reads_ibge_shape() {
        let cities: Vec<Municipality> =
            serde_json::from_str(r#"[{"id":3550308,"nome":"São Paulo"}]"#).unwrap();
        assert_eq!(cities[0].name, "São Paulo");
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            name: Some("Ana".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Ana" }));
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_level_progress() {
        let data = DashboardData {
            xp: 50,
            next_level_xp: 200,
            ..Default::default()
        };
        assert!((data.level_progress() - 0.25).abs() < f64::EPSILON);
        assert_eq!(DashboardData::default().level_progress(), 0.0);
    }

    #[test]
    fn test_uf_validation() {
        assert!(is_valid_uf("SP"));
        assert!(is_valid_uf("rj"));
        assert!(!is_valid_uf("XX"));
        assert_eq!(BRAZIL_STATES.len(), 27);
    }
}

use async_trait::async_trait;
use serde_json::json;
use tracing::info;
use url::Url;

use hayah_core::{
    ApiMessage, AuthApi, AuthSession, DashboardData, EmailAvailability, HayahError, Profile,
    ProfileApi, ProfileUpdate,
};

use crate::http::{build_client, join, parse_base, send_json};

/// REST client for the platform backend
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, request_timeout_seconds: Option<u64>) -> Result<Self, HayahError> {
        Ok(Self {
            http: build_client(request_timeout_seconds)?,
            base_url: parse_base(base_url)?,
        })
    }

    fn post(&self, path: &str) -> Result<reqwest::RequestBuilder, HayahError> {
        Ok(self.http.post(join(&self.base_url, path)?))
    }

    fn authed(
        &self,
        method: reqwest::Method,
        path: &str,
        token: &str,
    ) -> Result<reqwest::RequestBuilder, HayahError> {
        Ok(self
            .http
            .request(method, join(&self.base_url, path)?)
            .bearer_auth(token))
    }
}

#[async_trait]
impl AuthApi for BackendClient {
    async fn check_email(&self, email: &str) -> Result<EmailAvailability, HayahError> {
        send_json(self.post("auth/check-email")?.json(&json!({ "email": email }))).await
    }

    async fn register(&self, payload: &serde_json::Value) -> Result<AuthSession, HayahError> {
        info!("submitting registration");
        send_json(self.post("auth/register")?.json(payload)).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, HayahError> {
        send_json(
            self.post("auth/login")?
                .json(&json!({ "email": email, "password": password })),
        )
        .await
    }

    async fn send_recovery_code(&self, email: &str) -> Result<ApiMessage, HayahError> {
        send_json(self.post("auth/recovery/send")?.json(&json!({ "email": email }))).await
    }

    async fn verify_recovery_code(&self, email: &str, code: &str) -> Result<ApiMessage, HayahError> {
        send_json(
            self.post("auth/recovery/verify")?
                .json(&json!({ "email": email, "code": code })),
        )
        .await
    }

    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        password: &str,
    ) -> Result<ApiMessage, HayahError> {
        send_json(self.post("auth/recovery/reset")?.json(&json!({
            "email": email,
            "code": code,
            "password": password,
        })))
        .await
    }
}

#[async_trait]
impl ProfileApi for BackendClient {
    async fn get_profile(&self, token: &str) -> Result<Profile, HayahError> {
        send_json(self.authed(reqwest::Method::GET, "profile", token)?).await
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<Profile, HayahError> {
        send_json(self.authed(reqwest::Method::PUT, "profile", token)?.json(update)).await
    }

    async fn upload_image(
        &self,
        token: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Profile, HayahError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))
            .map_err(|e| HayahError::Validation(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("image", part);

        info!(file = file_name, "uploading profile image");
        send_json(
            self.authed(reqwest::Method::POST, "profile/image", token)?
                .multipart(form),
        )
        .await
    }

    async fn delete_image(&self, token: &str) -> Result<ApiMessage, HayahError> {
        send_json(self.authed(reqwest::Method::DELETE, "profile/image", token)?).await
    }

    async fn dashboard(&self, token: &str) -> Result<DashboardData, HayahError> {
        send_json(self.authed(reqwest::Method::GET, "dashboard", token)?).await
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_check_email_posts_email() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/check-email")
            .match_body(Matcher::Json(json!({ "email": "a@b.co" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"exists":true,"message":"Email already registered"}"#)
            .create_async()
            .await;

        let client = BackendClient::new(&server.url(), None).unwrap();
        let availability = client.check_email("a@b.co").await.unwrap();

        mock.assert_async().await;
        assert!(availability.exists);
    }

    #[tokio::test]
    async fn test_register_error_payload_becomes_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/register")
            .with_status(409)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Duplicate key: email"}"#)
            .create_async()
            .await;

        let client = BackendClient::new(&server.url(), None).unwrap();
        let err = client.register(&json!({ "email": "a@b.co" })).await.unwrap_err();

        mock.assert_async().await;
        match err {
            HayahError::Api { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Duplicate key: email");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_success_returns_session() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/register")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"tok","user":{"id":1,"name":"Ana","email":"a@b.co"}}"#)
            .create_async()
            .await;

        let client = BackendClient::new(&server.url(), None).unwrap();
        let session = client.register(&json!({})).await.unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.user.email, "a@b.co");
    }

    #[tokio::test]
    async fn test_error_without_payload_uses_status() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = BackendClient::new(&server.url(), None).unwrap();
        let err = client.login("a@b.co", "x").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // nothing listens on port 9 locally
        let client = BackendClient::new("http://127.0.0.1:9", Some(5)).unwrap();
        let err = client.check_email("a@b.co").await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_profile_sends_bearer_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/profile")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"u1","name":"Ana","email":"a@b.co","imageUrl":null}"#)
            .create_async()
            .await;

        let client = BackendClient::new(&format!("{}/api", server.url()), None).unwrap();
        let profile = client.get_profile("tok").await.unwrap();

        mock.assert_async().await;
        assert_eq!(profile.name, "Ana");
        assert!(profile.image_url.is_none());
    }

    #[tokio::test]
    async fn test_update_profile_sends_only_set_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/profile")
            .match_body(Matcher::Json(json!({ "city": "Campinas" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"Ana","city":"Campinas"}"#)
            .create_async()
            .await;

        let client = BackendClient::new(&server.url(), None).unwrap();
        let update = ProfileUpdate {
            city: Some("Campinas".into()),
            ..Default::default()
        };
        let profile = client.update_profile("tok", &update).await.unwrap();

        mock.assert_async().await;
        assert_eq!(profile.city, "Campinas");
    }

    #[tokio::test]
    async fn test_delete_image_accepts_empty_body() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/profile/image")
            .with_status(204)
            .create_async()
            .await;

        let client = BackendClient::new(&server.url(), None).unwrap();
        let message = client.delete_image("tok").await.unwrap();
        assert!(message.message.is_empty());
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("me.PNG"), "image/png");
        assert_eq!(mime_for("me.webp"), "image/webp");
        assert_eq!(mime_for("me.jpg"), "image/jpeg");
    }
}

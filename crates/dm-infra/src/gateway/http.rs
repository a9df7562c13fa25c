use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use dm_core::booking::{BookingRecord, BookingStatus};
use dm_core::errors::GatewayError;
use dm_core::identity::{Identity, Role};
use dm_core::ids::{BookingId, UserId};
use dm_core::ports::{
    AuthGatewayPort, BookingRepositoryPort, ProfileRepositoryPort, SignUpRequest,
};
use dm_core::profile::{Profile, ProfilePatch};

use crate::config::BackendConfig;

/// Initial display-only completion figure written at sign-up. Drivers have
/// more onboarding ahead of them than customers.
fn initial_completion(role: Role) -> u8 {
    match role {
        Role::Driver => 20,
        _ => 50,
    }
}

/// Client for the hosted backend's auth and PostgREST-style record
/// endpoints. Implements the auth gateway plus the profile and booking
/// repositories so the whole remote surface lives behind one connection
/// pool.
///
/// The anon key authenticates unauthenticated calls; after a sign-in the
/// session's access token is used instead. Requests never retry: a failed
/// call is reported and the user re-triggers the action.
pub struct HostedBackendClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    access_token: RwLock<Option<String>>,
}

impl HostedBackendClient {
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: RwLock::new(None),
        })
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{endpoint}", self.base_url)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    async fn bearer(&self) -> String {
        self.access_token
            .read()
            .await
            .clone()
            .unwrap_or_else(|| self.anon_key.clone())
    }

    async fn remember_token(&self, value: &Value) {
        if let Some(token) = value.get("access_token").and_then(Value::as_str) {
            *self.access_token.write().await = Some(token.to_string());
        }
    }

    async fn post_auth(&self, endpoint: &str, body: Value) -> Result<Value, GatewayError> {
        let response = self
            .http
            .post(self.auth_url(endpoint))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer().await)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let value: Value = check(response).await?.json().await.map_err(transport)?;
        Ok(value)
    }

    async fn fetch_profile(&self, id: &UserId) -> Result<Profile, GatewayError> {
        let response = self
            .http
            .get(self.rest_url("profiles"))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer().await)
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_string())])
            .send()
            .await
            .map_err(transport)?;
        let rows: Vec<Profile> = check(response).await?.json().await.map_err(transport)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::Rejected("profile not found".to_string()))
    }

    async fn insert_profile(&self, row: &Value) -> Result<Profile, GatewayError> {
        let response = self
            .http
            .post(self.rest_url("profiles"))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer().await)
            .json(row)
            .send()
            .await
            .map_err(transport)?;
        let rows: Vec<Profile> = check(response).await?.json().await.map_err(transport)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::Rejected("profile row was not created".to_string()))
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

/// Map a non-success response to the gateway taxonomy: client errors are
/// domain rejections with the backend's message, everything else is a
/// transport failure.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message =
        error_message(&body).unwrap_or_else(|| format!("request failed with status {status}"));
    if status.is_client_error() {
        Err(GatewayError::Rejected(message))
    } else {
        Err(GatewayError::Transport(message))
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    for key in ["msg", "message", "error_description", "error"] {
        if let Some(text) = value.get(key).and_then(Value::as_str) {
            return Some(text.to_string());
        }
    }
    None
}

fn user_id_from(value: &Value) -> Result<UserId, GatewayError> {
    value
        .pointer("/user/id")
        .or_else(|| value.get("id"))
        .and_then(Value::as_str)
        .map(UserId::from)
        .ok_or_else(|| GatewayError::Rejected("response carried no user id".to_string()))
}

#[async_trait]
impl AuthGatewayPort for HostedBackendClient {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<Identity, GatewayError> {
        let value = self
            .post_auth(
                "signup",
                json!({
                    "email": request.email,
                    "password": request.password,
                    "data": {
                        "name": request.name,
                        "phone": request.phone,
                        "role": request.role,
                    },
                }),
            )
            .await?;
        self.remember_token(&value).await;
        let user_id = user_id_from(&value)?;
        debug!(user = %user_id, "account created");

        let row = json!({
            "id": user_id,
            "name": request.name,
            "email": request.email,
            "phone": request.phone,
            "role": request.role,
            "profile_completion": initial_completion(request.role),
        });
        let profile = match self.insert_profile(&row).await {
            Ok(profile) => profile,
            // A backend trigger may have created the row already.
            Err(GatewayError::Rejected(reason)) => {
                warn!(%reason, "profile insert rejected, reading existing row");
                self.fetch_profile(&user_id).await?
            }
            Err(err) => return Err(err),
        };
        Ok(profile.to_identity())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, GatewayError> {
        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport)?;
        let value: Value = check(response).await?.json().await.map_err(transport)?;
        self.remember_token(&value).await;

        let user_id = user_id_from(&value)?;
        let profile = self.fetch_profile(&user_id).await?;
        Ok(profile.to_identity())
    }

    async fn send_verification_code(&self, email: &str) -> Result<(), GatewayError> {
        self.post_auth("otp", json!({ "email": email, "create_user": false }))
            .await
            .map(|_| ())
    }

    async fn verify_code(&self, email: &str, code: &str) -> Result<(), GatewayError> {
        self.post_auth(
            "verify",
            json!({ "type": "email", "email": email, "token": code }),
        )
        .await
        .map(|_| ())
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), GatewayError> {
        self.post_auth("recover", json!({ "email": email }))
            .await
            .map(|_| ())
    }

    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), GatewayError> {
        let value = self
            .post_auth(
                "verify",
                json!({ "type": "recovery", "email": email, "token": code }),
            )
            .await?;
        self.remember_token(&value).await;

        let response = self
            .http
            .put(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer().await)
            .json(&json!({ "password": new_password }))
            .send()
            .await
            .map_err(transport)?;
        check(response).await.map(|_| ())
    }
}

#[async_trait]
impl ProfileRepositoryPort for HostedBackendClient {
    async fn get(&self, id: &UserId) -> Result<Profile, GatewayError> {
        self.fetch_profile(id).await
    }

    async fn update(&self, id: &UserId, patch: &ProfilePatch) -> Result<Profile, GatewayError> {
        let response = self
            .http
            .patch(self.rest_url("profiles"))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer().await)
            .query(&[("id", format!("eq.{id}"))])
            .json(patch)
            .send()
            .await
            .map_err(transport)?;
        let rows: Vec<Profile> = check(response).await?.json().await.map_err(transport)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::Rejected("profile not found".to_string()))
    }

    async fn list_drivers(&self) -> Result<Vec<Profile>, GatewayError> {
        let response = self
            .http
            .get(self.rest_url("profiles"))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer().await)
            .query(&[
                ("role", "eq.driver"),
                ("select", "*"),
                ("order", "created_at.desc"),
            ])
            .send()
            .await
            .map_err(transport)?;
        check(response).await?.json().await.map_err(transport)
    }

    async fn count_customers_since(&self, since: DateTime<Utc>) -> Result<u64, GatewayError> {
        let response = self
            .http
            .get(self.rest_url("profiles"))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer().await)
            .query(&[
                ("role", "eq.customer".to_string()),
                (
                    "created_at",
                    format!("gte.{}", since.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ),
                ("select", "id".to_string()),
            ])
            .send()
            .await
            .map_err(transport)?;
        let rows: Vec<Value> = check(response).await?.json().await.map_err(transport)?;
        Ok(rows.len() as u64)
    }
}

#[async_trait]
impl BookingRepositoryPort for HostedBackendClient {
    async fn list(&self) -> Result<Vec<BookingRecord>, GatewayError> {
        let response = self
            .http
            .get(self.rest_url("bookings"))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer().await)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .map_err(transport)?;
        check(response).await?.json().await.map_err(transport)
    }

    async fn update_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<(), GatewayError> {
        let response = self
            .http
            .patch(self.rest_url("bookings"))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer().await)
            .query(&[("id", format!("eq.{id}"))])
            .json(&json!({ "status": status }))
            .send()
            .await
            .map_err(transport)?;
        check(response).await.map(|_| ())
    }
}

//! API request handlers

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::dispatch::RelayCredentials;
use crate::error::MailError;
use crate::service::{InlineRequest, Mailer, SlugRequest};
use crate::templates::{PlaceholderValue, Placeholders};
use crate::utils::generate_otp;

/// Value of the `otp` query parameter that asks for a generated code
const OTP_AUTO: &str = "auto";

/// Shared application state
pub struct AppState {
    pub mailer: Mailer,
    pub config: Arc<Config>,
}

/// One entry of the `placeholders` list in `POST /send`
#[derive(Debug, Deserialize)]
pub struct PlaceholderPair {
    pub key: String,
    pub value: PlaceholderValue,
}

/// Request body for `POST /send`
#[derive(Debug, Default, Deserialize)]
pub struct SendEmailRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub placeholders: Vec<PlaceholderPair>,
    #[serde(default)]
    pub smtp_server: Option<String>,
    #[serde(default)]
    pub smtp_port: Option<u16>,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
}

impl SendEmailRequest {
    /// Relay override, present only when a server was given
    fn credentials(&self) -> Option<RelayCredentials> {
        let server = self.smtp_server.as_deref().filter(|s| !s.is_empty())?;
        Some(RelayCredentials {
            server: server.to_string(),
            port: self.smtp_port.filter(|p| *p != 0),
            username: self.smtp_username.clone().filter(|u| !u.is_empty()),
            password: self.smtp_password.clone().filter(|p| !p.is_empty()),
        })
    }
}

/// Response for an accepted email
#[derive(Debug, Serialize, Deserialize)]
pub struct QueuedResponse {
    pub status: String,
    pub message: String,
    pub id: Uuid,
}

impl QueuedResponse {
    fn new(id: Uuid) -> Self {
        Self {
            status: "success".to_string(),
            message: "Email queued for delivery".to_string(),
            id,
        }
    }
}

/// Health/queue status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub queue_depth: usize,
    pub queue_capacity: usize,
    pub workers: usize,
    pub templates: usize,
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

impl IntoResponse for MailError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        (status, Json(ApiError::new(&self.to_string()))).into_response()
    }
}

/// GET /send - Render a registry template by slug and queue it
pub async fn send_by_slug(
    State(state): State<Arc<AppState>>,
    Query(mut query): Query<HashMap<String, String>>,
) -> Result<(StatusCode, Json<QueuedResponse>), MailError> {
    let to = query.remove("to").unwrap_or_default();
    let slug = query.remove("slug").unwrap_or_default();
    let subject = query.remove("subject");

    let placeholders = slug_placeholders(&mut query, state.config.templates.otp_length)?;

    let id = state.mailer.send_by_slug(SlugRequest {
        to,
        slug,
        subject,
        placeholders,
    })?;

    Ok((StatusCode::ACCEPTED, Json(QueuedResponse::new(id))))
}

/// POST /send - Render inline template source and queue it
pub async fn send_inline(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SendEmailRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<QueuedResponse>), MailError> {
    let Json(req) = body.map_err(|e| {
        MailError::Validation(format!("Invalid request body: {}", e.body_text()))
    })?;

    let credentials = req.credentials();
    let id = state.mailer.send_inline(InlineRequest {
        to: req.to,
        template: req.template,
        subject: req.subject,
        placeholders: req
            .placeholders
            .into_iter()
            .map(|p| (p.key, p.value))
            .collect(),
        credentials,
    })?;

    Ok((StatusCode::ACCEPTED, Json(QueuedResponse::new(id))))
}

/// GET /health - Queue and worker status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let dispatcher = state.mailer.dispatcher();
    let queue = dispatcher.queue();

    Json(HealthResponse {
        status: if dispatcher.is_accepting() { "ok" } else { "draining" }.to_string(),
        queue_depth: queue.len(),
        queue_capacity: queue.capacity(),
        workers: dispatcher.running_workers(),
        templates: state.mailer.renderer().registry().len(),
    })
}

/// Build the placeholder map for a slug send from its query parameters
///
/// Order of precedence, lowest first: the `data` JSON object, then the
/// `userId`/`name`/`otp` convenience keys. Whatever is left in `query`
/// afterwards is collected into a `Metadata` map.
fn slug_placeholders(
    query: &mut HashMap<String, String>,
    otp_length: usize,
) -> Result<Placeholders, MailError> {
    let mut placeholders = match query.remove("data").filter(|d| !d.is_empty()) {
        Some(data) => serde_json::from_str::<Placeholders>(&data).map_err(|_| {
            MailError::Validation("Invalid JSON in 'data' parameter".to_string())
        })?,
        None => Placeholders::new(),
    };

    for key in ["userId", "name"] {
        if let Some(value) = query.remove(key) {
            placeholders.insert(key.to_string(), value.into());
        }
    }

    let wants_otp = query
        .remove("generate_otp")
        .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1");
    match query.remove("otp") {
        Some(otp) if otp.eq_ignore_ascii_case(OTP_AUTO) => {
            placeholders.insert("otp".to_string(), generate_otp(otp_length).into());
        }
        Some(otp) => {
            placeholders.insert("otp".to_string(), otp.into());
        }
        None if wants_otp => {
            placeholders.insert("otp".to_string(), generate_otp(otp_length).into());
        }
        None => {}
    }

    let metadata: BTreeMap<String, PlaceholderValue> = query
        .drain()
        .map(|(key, value)| (key, value.into()))
        .collect();
    if !metadata.is_empty() {
        placeholders.insert("Metadata".to_string(), metadata.into());
    }

    Ok(placeholders)
}

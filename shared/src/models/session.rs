//! Session model — one table/ordering context a customer interacts through

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A table session
///
/// `customer_url` is derived from the configured frontend base URL at
/// read time; the store never holds an authoritative copy.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub name: String,
    pub table_number: Option<String>,
    pub is_active: bool,
    /// Derived, filled by [`Session::with_customer_url`]
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Attach the derived customer URL for the given frontend base
    pub fn with_customer_url(mut self, frontend_url: &str) -> Self {
        self.customer_url = Some(format!(
            "{frontend_url}/customer.html?sessionId={}",
            self.session_id
        ));
        self
    }
}

/// Creation payload for `POST /api/sessions/create`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub table_number: Option<String>,
}

/// Explicit partial update for `PUT /api/sessions/{sessionId}`
///
/// Only the supplied fields change; absent fields keep their stored
/// value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

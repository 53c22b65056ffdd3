#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! The CLI's JSON wire envelope: a stable `{ok, rid, t, d, err, fix}` shape
//! every `contract-bus` subcommand emits on stdout.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

impl From<&CoreError> for ProtocolError {
    fn from(err: &CoreError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            fix: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolEnvelope<D: Serialize> {
    pub ok: bool,
    pub rid: String,
    pub t: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<D>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<ProtocolError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ms: Option<u64>,
}

impl<D: Serialize> ProtocolEnvelope<D> {
    #[must_use]
    pub fn success(rid: impl Into<String>, data: D) -> Self {
        Self {
            ok: true,
            rid: rid.into(),
            t: chrono::Utc::now(),
            d: Some(data),
            err: None,
            ms: None,
        }
    }

    #[must_use]
    pub fn with_ms(mut self, ms: u64) -> Self {
        self.ms = Some(ms);
        self
    }
}

impl ProtocolEnvelope<()> {
    #[must_use]
    pub fn error(rid: impl Into<String>, error: &CoreError) -> Self {
        Self {
            ok: false,
            rid: rid.into(),
            t: chrono::Utc::now(),
            d: None,
            err: Some(ProtocolError::from(error)),
            ms: None,
        }
    }
}

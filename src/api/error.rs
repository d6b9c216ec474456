// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the event backend.
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("Invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {detail}")]
    UnexpectedStatus { status: StatusCode, detail: String },
}

impl ApiError {
    /// Builds an [`ApiError::UnexpectedStatus`] from an error response body,
    /// preferring the backend's JSON `detail` message over the raw text.
    pub(crate) fn from_body(status: StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| match value.get("detail") {
                Some(serde_json::Value::String(detail)) => Some(detail.clone()),
                Some(other) => Some(other.to_string()),
                None => None,
            })
            .unwrap_or_else(|| body.trim().to_string());

        ApiError::UnexpectedStatus { status, detail }
    }

    /// A short message suitable for a toast.
    pub(crate) fn user_message(&self) -> String {
        match self {
            ApiError::UnexpectedStatus { detail, status } if detail.is_empty() => status.to_string(),
            ApiError::UnexpectedStatus { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Permission;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    PermissionDenied,
    ProviderQuery,
    Validation,
    ActionLaunch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactsError {
    #[error("permission to {} is not granted", .0.label())]
    PermissionDenied(Permission),
    #[error("contact provider query failed: {0}")]
    ProviderQuery(String),
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("could not launch {target}: {message}")]
    ActionLaunch { target: String, message: String },
}

impl ContactsError {
    pub fn provider(err: impl std::fmt::Display) -> Self {
        Self::ProviderQuery(format!("{err:#}"))
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ContactsError::PermissionDenied(_) => ErrorCode::PermissionDenied,
            ContactsError::ProviderQuery(_) => ErrorCode::ProviderQuery,
            ContactsError::Validation { .. } => ErrorCode::Validation,
            ContactsError::ActionLaunch { .. } => ErrorCode::ActionLaunch,
        }
    }
}

//! UI/backend events and error modeling for desktop GUI controller.

use shared::{
    domain::{Contact, ContactId},
    error::{ContactsError, ErrorCode},
};

pub enum UiEvent {
    Info(String),
    BackendReady,
    ContactsLoaded {
        seq: u64,
        result: Result<Vec<Contact>, ContactsError>,
    },
    ContactCreated {
        contact_id: ContactId,
        name: String,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Permission,
    Provider,
    Validation,
    Action,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadContacts,
    CreateContact,
    LaunchAction,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_contacts_error(context: UiErrorContext, err: &ContactsError) -> Self {
        let category = match err.code() {
            ErrorCode::PermissionDenied => UiErrorCategory::Permission,
            ErrorCode::ProviderQuery => UiErrorCategory::Provider,
            ErrorCode::Validation => UiErrorCategory::Validation,
            ErrorCode::ActionLaunch => UiErrorCategory::Action,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    /// Classifies free-form failures (startup, I/O) by keyword.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("permission")
            || message_lower.contains("not granted")
            || message_lower.contains("access denied")
        {
            UiErrorCategory::Permission
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("sqlite")
            || message_lower.contains("database")
            || message_lower.contains("contact store")
            || message_lower.contains("query")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Provider
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn needs_settings_redirect(&self) -> bool {
        self.category == UiErrorCategory::Permission
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Permission => "Permission",
        UiErrorCategory::Provider => "Contacts",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Action => "Action",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::Permission;

    #[test]
    fn classifies_worker_disconnect_as_provider_error() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Backend worker disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Provider);
        assert!(!err.needs_settings_redirect());
    }

    #[test]
    fn maps_contacts_errors_by_code() {
        let err = UiError::from_contacts_error(
            UiErrorContext::LoadContacts,
            &ContactsError::PermissionDenied(Permission::ReadContacts),
        );
        assert_eq!(err.category(), UiErrorCategory::Permission);
        assert!(err.needs_settings_redirect());
        assert_eq!(err.context(), UiErrorContext::LoadContacts);

        let err = UiError::from_contacts_error(
            UiErrorContext::CreateContact,
            &ContactsError::validation("name", "must not be empty"),
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.message(), "invalid name: must not be empty");
    }

    #[test]
    fn unknown_messages_fall_through() {
        let err = UiError::from_message(UiErrorContext::General, "something odd");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert_eq!(err_label(err.category()), "Unexpected");
    }
}

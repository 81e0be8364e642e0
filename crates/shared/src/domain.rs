use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ContactId);

/// A contact as read from the address book: one display name paired with
/// the first phone number found for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone_number: String,
}

impl Contact {
    pub fn new(id: ContactId, name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            phone_number: phone_number.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
}

/// One rendered row of the grouped contact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayEntry {
    Header { letter: String },
    ContactRow { contact: Contact },
}

impl DisplayEntry {
    pub fn is_header(&self) -> bool {
        matches!(self, DisplayEntry::Header { .. })
    }

    pub fn contact(&self) -> Option<&Contact> {
        match self {
            DisplayEntry::Header { .. } => None,
            DisplayEntry::ContactRow { contact } => Some(contact),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ReadContacts,
    WriteContacts,
    CallPhone,
    SendSms,
}

impl Permission {
    pub fn label(self) -> &'static str {
        match self {
            Permission::ReadContacts => "read contacts",
            Permission::WriteContacts => "write contacts",
            Permission::CallPhone => "place calls",
            Permission::SendSms => "send messages",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    Granted,
    #[default]
    NotDetermined,
    Denied,
    PermanentlyDenied,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        self == PermissionState::Granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_entry_serializes_with_type_tag() {
        let header = DisplayEntry::Header {
            letter: "A".to_string(),
        };
        let json = serde_json::to_value(&header).expect("serialize header");
        assert_eq!(json["type"], "header");
        assert_eq!(json["letter"], "A");

        let row = DisplayEntry::ContactRow {
            contact: Contact::new(ContactId(7), "Anna", "333"),
        };
        assert!(!row.is_header());
        assert_eq!(row.contact().map(|c| c.name.as_str()), Some("Anna"));
    }

    #[test]
    fn new_contact_defaults_missing_phone_numbers() {
        let parsed: NewContact =
            serde_json::from_str(r#"{"name":"Bob"}"#).expect("parse new contact");
        assert!(parsed.phone_numbers.is_empty());
    }

    #[test]
    fn permission_state_parses_snake_case() {
        let state: PermissionState =
            serde_json::from_str("\"permanently_denied\"").expect("parse state");
        assert_eq!(state, PermissionState::PermanentlyDenied);
        assert!(!state.is_granted());
    }
}

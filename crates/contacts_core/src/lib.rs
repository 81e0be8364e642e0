//! Address-book logic shared by the desktop app and the CLI tools: reading the
//! contact store, grouping and filtering the list, and the screen session that
//! owns the master and display lists.

pub mod actions;
pub mod config;
pub mod filter;
pub mod grouping;
pub mod permissions;
pub mod provider;
pub mod session;

pub use actions::{action_uri, normalize_phone_number, validate_new_contact, ContactAction};
pub use filter::{filter_and_group, filter_contacts};
pub use grouping::{group_contacts, leading_letter, sort_by_name, FALLBACK_LETTER};
pub use permissions::{
    ConfiguredPermissions, Consent, PermissionGate, PermissionReport, REQUIRED_PERMISSIONS,
};
pub use provider::{create_contact, load_contacts, ContactProvider};
pub use session::{ContactsSession, LoadOutcome, LoadTicket};

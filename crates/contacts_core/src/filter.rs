use shared::domain::{Contact, DisplayEntry};

use crate::grouping::group_contacts;

/// Contacts whose name contains `query`, compared case-insensitively.
/// An empty query keeps every contact. Master-list order is preserved.
pub fn filter_contacts(query: &str, contacts: &[Contact]) -> Vec<Contact> {
    if query.is_empty() {
        return contacts.to_vec();
    }

    let needle = query.to_lowercase();
    contacts
        .iter()
        .filter(|contact| contact.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub fn filter_and_group(query: &str, contacts: &[Contact]) -> Vec<DisplayEntry> {
    group_contacts(&filter_contacts(query, contacts))
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;

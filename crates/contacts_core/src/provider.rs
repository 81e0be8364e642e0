use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{Contact, ContactId, NewContact},
    error::ContactsError,
};
use storage::{ContactRecord, Storage};
use tracing::{debug, info};

use crate::{actions::validate_new_contact, grouping::sort_by_name};

/// Read/write access to the address book backing the contact list.
#[async_trait]
pub trait ContactProvider: Send + Sync {
    async fn query_contact_records(&self) -> Result<Vec<ContactRecord>>;
    async fn insert_contact(&self, contact: &NewContact) -> Result<ContactId>;
}

#[async_trait]
impl ContactProvider for Storage {
    async fn query_contact_records(&self) -> Result<Vec<ContactRecord>> {
        Storage::query_contact_records(self).await
    }

    async fn insert_contact(&self, contact: &NewContact) -> Result<ContactId> {
        Storage::insert_contact(self, contact).await
    }
}

/// Reads the master list: contacts with at least one phone number, each
/// paired with its first number, sorted by name.
///
/// Callers must have checked the read-contacts permission first.
pub async fn load_contacts<P>(provider: &P) -> Result<Vec<Contact>, ContactsError>
where
    P: ContactProvider + ?Sized,
{
    let records = provider
        .query_contact_records()
        .await
        .map_err(ContactsError::provider)?;
    let total = records.len();

    let mut contacts: Vec<Contact> = records
        .into_iter()
        .filter(|record| record.has_phone_number)
        .filter_map(|record| {
            let phone_number = record.first_phone_number?;
            Some(Contact {
                id: record.contact_id,
                name: record.display_name.unwrap_or_default(),
                phone_number,
            })
        })
        .collect();
    sort_by_name(&mut contacts);

    debug!(
        total,
        with_phone = contacts.len(),
        "loaded contacts from provider"
    );
    Ok(contacts)
}

/// Validates and inserts a single-number contact.
pub async fn create_contact<P>(
    provider: &P,
    name: &str,
    phone_number: &str,
) -> Result<ContactId, ContactsError>
where
    P: ContactProvider + ?Sized,
{
    let new_contact = validate_new_contact(name, phone_number)?;
    let contact_id = provider
        .insert_contact(&new_contact)
        .await
        .map_err(ContactsError::provider)?;
    info!(contact_id = contact_id.0, "created contact");
    Ok(contact_id)
}

#[cfg(test)]
#[path = "tests/provider_tests.rs"]
mod tests;

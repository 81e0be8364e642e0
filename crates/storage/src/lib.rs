use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{fs, str::FromStr};
use tracing::debug;

use shared::domain::{ContactId, NewContact};

mod location;

pub use location::{
    normalize_database_url, sqlite_location, SqliteLocation, DEFAULT_DATABASE_URL,
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

/// One address-book row as the provider exposes it: the display name may be
/// missing and only the first phone number (by insertion order) is carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub contact_id: ContactId,
    pub display_name: Option<String>,
    pub has_phone_number: bool,
    pub first_phone_number: Option<String>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        let location = sqlite_location(database_url);
        if let Some(SqliteLocation::File(path)) = &location {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "failed to create directory '{}' for the contact store",
                        parent.display()
                    )
                })?;
            }
        }

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url '{database_url}'"))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every pooled connection to `:memory:` would open its own empty database.
        let pool = if location == Some(SqliteLocation::Memory) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(connect_options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(connect_options)
                .await?
        };
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run contact store migrations")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn insert_contact(&self, contact: &NewContact) -> Result<ContactId> {
        let mut tx = self.pool.begin().await?;

        let rec = sqlx::query("INSERT INTO contacts (display_name) VALUES (?) RETURNING id")
            .bind(&contact.name)
            .fetch_one(&mut *tx)
            .await
            .context("failed to insert contact")?;
        let contact_id = ContactId(rec.get::<i64, _>(0));

        for number in &contact.phone_numbers {
            sqlx::query("INSERT INTO phone_numbers (contact_id, number) VALUES (?, ?)")
                .bind(contact_id.0)
                .bind(number)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to insert phone number for contact {}", contact_id.0))?;
        }

        tx.commit().await?;
        debug!(
            contact_id = contact_id.0,
            phone_numbers = contact.phone_numbers.len(),
            "inserted contact"
        );
        Ok(contact_id)
    }

    pub async fn add_phone_number(&self, contact_id: ContactId, number: &str) -> Result<()> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM contacts WHERE id = ?")
            .bind(contact_id.0)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            anyhow::bail!("contact {} does not exist", contact_id.0);
        }

        sqlx::query("INSERT INTO phone_numbers (contact_id, number) VALUES (?, ?)")
            .bind(contact_id.0)
            .bind(number)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to add phone number to contact {}", contact_id.0))?;
        Ok(())
    }

    pub async fn query_contact_records(&self) -> Result<Vec<ContactRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id,
                   c.display_name,
                   EXISTS (SELECT 1 FROM phone_numbers p WHERE p.contact_id = c.id) AS has_phone_number,
                   (SELECT p.number FROM phone_numbers p
                     WHERE p.contact_id = c.id
                     ORDER BY p.id ASC
                     LIMIT 1) AS first_phone_number
              FROM contacts c
             ORDER BY c.display_name COLLATE NOCASE ASC, c.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to query contacts")?;

        rows.into_iter()
            .map(|row| -> Result<ContactRecord> {
                Ok(ContactRecord {
                    contact_id: ContactId(row.try_get::<i64, _>("id")?),
                    display_name: row.try_get::<Option<String>, _>("display_name")?,
                    has_phone_number: row.try_get::<i64, _>("has_phone_number")? != 0,
                    first_phone_number: row.try_get::<Option<String>, _>("first_phone_number")?,
                })
            })
            .collect()
    }

    pub async fn contact_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use contacts_core::{
    config::{load_settings, Settings},
    load_contacts, normalize_phone_number, validate_new_contact, ConfiguredPermissions,
    ContactProvider, ContactsSession, LoadOutcome,
};
use shared::domain::{ContactId, DisplayEntry, NewContact};
use storage::{normalize_database_url, Storage};
use tracing_subscriber::EnvFilter;

/// Maintenance CLI for the contacts address book.
#[derive(Parser, Debug)]
struct Cli {
    /// Defaults to `database_url` from contacts.toml.
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add one contact with one or more phone numbers.
    Add {
        name: String,
        #[arg(required = true)]
        phone_numbers: Vec<String>,
    },
    /// Import a JSON array of `{ "name": ..., "phone_numbers": [...] }`.
    Import { path: PathBuf },
    /// Print the grouped contact list.
    List {
        #[arg(long)]
        query: Option<String>,
    },
    Count,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings().unwrap_or_else(|err| {
        eprintln!("warning: using default settings: {err}");
        Settings::default()
    });
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let database_url = normalize_database_url(
        cli.database_url
            .as_deref()
            .unwrap_or(settings.database_url.as_str()),
    );
    let storage = Storage::new(&database_url).await?;

    match cli.command {
        Command::Add {
            name,
            phone_numbers,
        } => {
            let contact_id = add_contact(&storage, &name, &phone_numbers).await?;
            println!("created contact_id={}", contact_id.0);
        }
        Command::Import { path } => {
            let imported = import_contacts(&storage, &path).await?;
            println!("imported {imported} contacts");
        }
        Command::List { query } => {
            for line in list_lines(&storage, query.as_deref().unwrap_or("")).await? {
                println!("{line}");
            }
        }
        Command::Count => {
            println!("{}", storage.contact_count().await?);
        }
    }

    Ok(())
}

async fn add_contact(
    provider: &dyn ContactProvider,
    name: &str,
    phone_numbers: &[String],
) -> Result<ContactId> {
    let Some((first, rest)) = phone_numbers.split_first() else {
        bail!("at least one phone number is required");
    };
    let mut new_contact = validate_new_contact(name, first)?;
    for number in rest {
        normalize_phone_number(number)?;
        new_contact.phone_numbers.push(number.trim().to_string());
    }
    provider.insert_contact(&new_contact).await
}

/// Imported entries may lack a name or numbers; such contacts are stored
/// but never listed.
async fn import_contacts(provider: &dyn ContactProvider, path: &Path) -> Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read import file '{}'", path.display()))?;
    let contacts: Vec<NewContact> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse import file '{}'", path.display()))?;

    for (idx, contact) in contacts.iter().enumerate() {
        for number in &contact.phone_numbers {
            normalize_phone_number(number)
                .with_context(|| format!("entry {idx} ('{}')", contact.name))?;
        }
    }

    for contact in &contacts {
        provider.insert_contact(contact).await?;
    }
    tracing::info!(count = contacts.len(), "imported contacts");
    Ok(contacts.len())
}

async fn list_lines(provider: &dyn ContactProvider, query: &str) -> Result<Vec<String>> {
    let mut session = ContactsSession::new();
    // The operator owns the database file, so every permission is granted.
    let ticket = session.begin_load(&ConfiguredPermissions::grant_all())?;
    let result = load_contacts(provider).await;
    if let LoadOutcome::Failed(err) = session.apply_load(ticket, result) {
        return Err(err.into());
    }
    session.set_query(query);

    Ok(session.display().iter().map(render_entry).collect())
}

fn render_entry(entry: &DisplayEntry) -> String {
    match entry {
        DisplayEntry::Header { letter } => format!("[{letter}]"),
        DisplayEntry::ContactRow { contact } => {
            format!("  {:<24} {}", contact.name, contact.phone_number)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_storage() -> Storage {
        Storage::new("sqlite::memory:")
            .await
            .expect("in-memory storage")
    }

    #[tokio::test]
    async fn add_rejects_bad_numbers_before_inserting() {
        let storage = memory_storage().await;
        let err = add_contact(&storage, "Ann", &["555".to_string(), "call me".to_string()])
            .await
            .expect_err("second number is invalid");
        assert!(err.to_string().contains("phone number"));
        assert_eq!(storage.contact_count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn list_prints_headers_and_filtered_rows() {
        let storage = memory_storage().await;
        add_contact(&storage, "bob", &["222".to_string()]).await.expect("add");
        add_contact(&storage, "Anna", &["111".to_string(), "112".to_string()])
            .await
            .expect("add");
        add_contact(&storage, "Abe", &["333".to_string()]).await.expect("add");

        let lines = list_lines(&storage, "").await.expect("list");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "[A]");
        assert!(lines[1].trim_start().starts_with("Abe"));
        assert!(lines[2].trim_start().starts_with("Anna"));
        assert!(lines[2].ends_with("111"));
        assert_eq!(lines[3], "[B]");

        let lines = list_lines(&storage, "NN").await.expect("list");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[A]");
    }

    #[tokio::test]
    async fn import_reads_json_array() {
        let storage = memory_storage().await;
        let suffix = std::process::id();
        let path = std::env::temp_dir().join(format!("contacts_import_test_{suffix}.json"));
        std::fs::write(
            &path,
            r#"[{"name":"Cara","phone_numbers":["+1 555 0101"]},{"name":"No Number"}]"#,
        )
        .expect("write import file");

        let imported = import_contacts(&storage, &path).await.expect("import");
        let _ = std::fs::remove_file(&path);

        assert_eq!(imported, 2);
        assert_eq!(storage.contact_count().await.expect("count"), 2);
        let lines = list_lines(&storage, "").await.expect("list");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[C]");
    }
}

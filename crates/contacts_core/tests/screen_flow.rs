use contacts_core::{
    create_contact, load_contacts, ConfiguredPermissions, ContactsSession, LoadOutcome,
};
use shared::domain::DisplayEntry;
use storage::Storage;

fn rendered(entries: &[DisplayEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| match entry {
            DisplayEntry::Header { letter } => format!("[{letter}]"),
            DisplayEntry::ContactRow { contact } => contact.name.clone(),
        })
        .collect()
}

#[tokio::test]
async fn load_group_and_filter_against_sqlite() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    for (name, number) in [("Bob", "111"), ("alice", "222"), ("Anna", "333")] {
        create_contact(&storage, name, number)
            .await
            .expect("seed contact");
    }

    let gate = ConfiguredPermissions::grant_all();
    let mut session = ContactsSession::new();
    let ticket = session.begin_load(&gate).expect("permission granted");
    let outcome = session.apply_load(ticket, load_contacts(&storage).await);
    assert_eq!(outcome, LoadOutcome::Applied { contacts: 3 });
    assert_eq!(
        rendered(session.display()),
        vec!["[A]", "alice", "Anna", "[B]", "Bob"]
    );

    session.set_query("AN");
    assert_eq!(rendered(session.display()), vec!["[A]", "Anna"]);

    session.set_query("xyz");
    assert!(session.display().is_empty());

    create_contact(&storage, "Diana", "444")
        .await
        .expect("new contact");
    session.set_query("an");
    let ticket = session.begin_load(&gate).expect("reload");
    session.apply_load(ticket, load_contacts(&storage).await);
    assert_eq!(
        rendered(session.display()),
        vec!["[A]", "Anna", "[D]", "Diana"]
    );
}

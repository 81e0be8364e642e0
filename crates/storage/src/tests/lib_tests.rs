use super::*;

fn new_contact(name: &str, numbers: &[&str]) -> NewContact {
    NewContact {
        name: name.to_string(),
        phone_numbers: numbers.iter().map(|n| n.to_string()).collect(),
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("contacts_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("contacts.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    storage.pool().close().await;
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn records_carry_first_inserted_phone_number() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let id = storage
        .insert_contact(&new_contact("Anna", &["333", "444"]))
        .await
        .expect("insert");
    storage.add_phone_number(id, "555").await.expect("extra number");

    let records = storage.query_contact_records().await.expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].contact_id, id);
    assert!(records[0].has_phone_number);
    assert_eq!(records[0].first_phone_number.as_deref(), Some("333"));
}

#[tokio::test]
async fn records_without_numbers_are_flagged() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .insert_contact(&new_contact("Nobody", &[]))
        .await
        .expect("insert");

    let records = storage.query_contact_records().await.expect("records");
    assert_eq!(records.len(), 1);
    assert!(!records[0].has_phone_number);
    assert_eq!(records[0].first_phone_number, None);
}

#[tokio::test]
async fn records_are_ordered_by_name_ignoring_case() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    for (name, number) in [("Bob", "111"), ("alice", "222"), ("Anna", "333")] {
        storage
            .insert_contact(&new_contact(name, &[number]))
            .await
            .expect("insert");
    }

    let names: Vec<_> = storage
        .query_contact_records()
        .await
        .expect("records")
        .into_iter()
        .map(|r| r.display_name.unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["alice", "Anna", "Bob"]);
}

#[tokio::test]
async fn null_display_name_is_reported_as_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let rec = sqlx::query("INSERT INTO contacts (display_name) VALUES (NULL) RETURNING id")
        .fetch_one(storage.pool())
        .await
        .expect("insert unnamed");
    let id = ContactId(rec.get::<i64, _>(0));
    storage.add_phone_number(id, "999").await.expect("number");

    let records = storage.query_contact_records().await.expect("records");
    assert_eq!(records[0].display_name, None);
    assert_eq!(records[0].first_phone_number.as_deref(), Some("999"));
}

#[tokio::test]
async fn adding_number_to_missing_contact_fails() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let err = storage
        .add_phone_number(ContactId(42), "123")
        .await
        .expect_err("missing contact");
    assert!(err.to_string().contains("does not exist"));
}

#[tokio::test]
async fn counts_contacts() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    assert_eq!(storage.contact_count().await.expect("count"), 0);
    storage
        .insert_contact(&new_contact("Diana", &["1"]))
        .await
        .expect("insert");
    assert_eq!(storage.contact_count().await.expect("count"), 1);
}

use super::*;
use shared::domain::ContactId;

fn contact(id: i64, name: &str, number: &str) -> Contact {
    Contact::new(ContactId(id), name, number)
}

fn header(letter: &str) -> DisplayEntry {
    DisplayEntry::Header {
        letter: letter.to_string(),
    }
}

fn row(contact: &Contact) -> DisplayEntry {
    DisplayEntry::ContactRow {
        contact: contact.clone(),
    }
}

#[test]
fn sorts_and_groups_mixed_case_names() {
    let bob = contact(1, "Bob", "111");
    let alice = contact(2, "alice", "222");
    let anna = contact(3, "Anna", "333");
    let mut contacts = vec![bob.clone(), alice.clone(), anna.clone()];

    sort_by_name(&mut contacts);
    assert_eq!(contacts, vec![alice.clone(), anna.clone(), bob.clone()]);

    assert_eq!(
        group_contacts(&contacts),
        vec![header("A"), row(&alice), row(&anna), header("B"), row(&bob)]
    );
}

#[test]
fn accented_names_sort_with_their_base_letter() {
    let zoe = contact(1, "Zoe", "1");
    let emile = contact(2, "Émile", "2");
    let dora = contact(3, "Dora", "3");
    let fay = contact(4, "Fay", "4");
    let eve = contact(5, "eve", "5");
    let mut contacts = vec![zoe.clone(), emile.clone(), dora.clone(), fay.clone(), eve.clone()];

    sort_by_name(&mut contacts);
    let names: Vec<_> = contacts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Dora", "Émile", "eve", "Fay", "Zoe"]);
}

#[test]
fn accent_breaks_ties_between_otherwise_equal_names() {
    let plain = contact(1, "Rene", "1");
    let accented = contact(2, "René", "2");
    let mut contacts = vec![accented.clone(), plain.clone()];
    sort_by_name(&mut contacts);
    assert_eq!(contacts, vec![plain, accented]);
}

#[test]
fn empty_input_produces_no_entries() {
    assert!(group_contacts(&[]).is_empty());
}

#[test]
fn empty_name_falls_back_to_hash_header() {
    let unnamed = contact(1, "", "100");
    let blank = contact(2, "   ", "101");
    let zoe = contact(3, "Zoe", "102");
    let mut contacts = vec![zoe.clone(), blank.clone(), unnamed.clone()];
    sort_by_name(&mut contacts);

    let entries = group_contacts(&contacts);
    assert_eq!(entries[0], header(FALLBACK_LETTER));
    assert_eq!(
        entries.iter().filter(|e| e.is_header()).count(),
        2,
        "one fallback header and one Z header: {entries:?}"
    );
    assert_eq!(entries.last(), Some(&row(&zoe)));
}

#[test]
fn leading_letter_uppercases_and_skips_whitespace() {
    assert_eq!(leading_letter("alice"), "A");
    assert_eq!(leading_letter("  bob"), "B");
    assert_eq!(leading_letter("émile"), "É");
    assert_eq!(leading_letter("42nd Street Deli"), "4");
    assert_eq!(leading_letter(""), "#");
}

#[test]
fn emits_one_header_per_run_and_keeps_every_contact() {
    let names = [
        "aaron", "Abe", "adele", "Bea", "bo", "Carl", "dora", "Dov", "eve", "Zed", "zia",
    ];
    let mut contacts: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| contact(idx as i64, name, "1"))
        .collect();
    sort_by_name(&mut contacts);

    let entries = group_contacts(&contacts);
    let rows = entries.iter().filter(|e| !e.is_header()).count();
    assert_eq!(rows, contacts.len());

    let mut runs = 0;
    let mut previous: Option<String> = None;
    for c in &contacts {
        let letter = leading_letter(&c.name);
        if previous.as_deref() != Some(letter.as_str()) {
            runs += 1;
            previous = Some(letter);
        }
    }
    let headers: Vec<_> = entries
        .iter()
        .filter_map(|e| match e {
            DisplayEntry::Header { letter } => Some(letter.as_str()),
            DisplayEntry::ContactRow { .. } => None,
        })
        .collect();
    assert_eq!(headers.len(), runs);
    assert_eq!(headers, vec!["A", "B", "C", "D", "E", "Z"]);
}

#[test]
fn sort_is_stable_for_identical_names() {
    let first = contact(1, "Sam", "1");
    let second = contact(2, "Sam", "2");
    let mut contacts = vec![first.clone(), second.clone()];
    sort_by_name(&mut contacts);
    assert_eq!(contacts, vec![first, second]);
}

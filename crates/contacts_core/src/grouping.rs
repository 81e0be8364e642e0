use icu_collator::{
    options::{CollatorOptions, Strength},
    Collator,
};
use shared::domain::{Contact, DisplayEntry};
use tracing::warn;

/// Header letter used for contacts whose name has no usable first character.
pub const FALLBACK_LETTER: &str = "#";

/// Uppercased first character of `name`, ignoring leading whitespace.
pub fn leading_letter(name: &str) -> String {
    match name.trim_start().chars().next() {
        Some(first) => first.to_uppercase().collect(),
        None => FALLBACK_LETTER.to_string(),
    }
}

/// Stable sort in root-locale collation order, accent-sensitive but
/// case-insensitive, with the raw name as tie-break.
///
/// Leading whitespace is ignored so the order agrees with [`leading_letter`].
pub fn sort_by_name(contacts: &mut [Contact]) {
    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Secondary);

    match Collator::try_new(Default::default(), options) {
        Ok(collator) => contacts.sort_by(|a, b| {
            let (a, b) = (a.name.trim_start(), b.name.trim_start());
            collator.compare(a, b).then_with(|| a.cmp(b))
        }),
        Err(err) => {
            warn!("collation data unavailable, sorting by lowercased name: {err}");
            contacts.sort_by_cached_key(|contact| {
                let trimmed = contact.name.trim_start();
                (trimmed.to_lowercase(), trimmed.to_string())
            });
        }
    }
}

/// Interleaves a header before every run of contacts sharing a leading letter.
///
/// The input must already be sorted by name; nothing is reordered here, so an
/// unsorted input yields one header per run rather than one per letter.
pub fn group_contacts(contacts: &[Contact]) -> Vec<DisplayEntry> {
    let mut entries = Vec::with_capacity(contacts.len() + contacts.len().min(32));
    let mut current: Option<String> = None;

    for contact in contacts {
        let letter = leading_letter(&contact.name);
        if current.as_deref() != Some(letter.as_str()) {
            entries.push(DisplayEntry::Header {
                letter: letter.clone(),
            });
            current = Some(letter);
        }
        entries.push(DisplayEntry::ContactRow {
            contact: contact.clone(),
        });
    }

    entries
}

#[cfg(test)]
#[path = "tests/grouping_tests.rs"]
mod tests;

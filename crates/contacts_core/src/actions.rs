use shared::{
    domain::{NewContact, Permission},
    error::ContactsError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAction {
    Call,
    Message,
}

impl ContactAction {
    pub fn label(self) -> &'static str {
        match self {
            ContactAction::Call => "Call",
            ContactAction::Message => "Message",
        }
    }

    pub fn required_permission(self) -> Permission {
        match self {
            ContactAction::Call => Permission::CallPhone,
            ContactAction::Message => Permission::SendSms,
        }
    }

    fn scheme(self) -> &'static str {
        match self {
            ContactAction::Call => "tel",
            ContactAction::Message => "sms",
        }
    }
}

/// Strips separators from a dialable number, keeping an optional leading `+`.
pub fn normalize_phone_number(raw: &str) -> Result<String, ContactsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ContactsError::validation("phone number", "must not be empty"));
    }

    let mut normalized = String::with_capacity(trimmed.len());
    for (idx, ch) in trimmed.chars().enumerate() {
        match ch {
            '0'..='9' => normalized.push(ch),
            '+' if idx == 0 => normalized.push(ch),
            ' ' | '-' | '.' | '(' | ')' => {}
            other => {
                return Err(ContactsError::validation(
                    "phone number",
                    format!("unexpected character '{other}'"),
                ))
            }
        }
    }

    if !normalized.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(ContactsError::validation(
            "phone number",
            "must contain at least one digit",
        ));
    }
    Ok(normalized)
}

/// URI handed to the OS handler for a call or message to `phone_number`.
pub fn action_uri(action: ContactAction, phone_number: &str) -> Result<String, ContactsError> {
    let number = normalize_phone_number(phone_number)?;
    Ok(format!("{}:{number}", action.scheme()))
}

pub fn validate_new_contact(name: &str, phone_number: &str) -> Result<NewContact, ContactsError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ContactsError::validation("name", "must not be empty"));
    }
    normalize_phone_number(phone_number)?;

    Ok(NewContact {
        name: name.to_string(),
        phone_numbers: vec![phone_number.trim().to_string()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_formatted_numbers() {
        assert_eq!(
            normalize_phone_number("+1 (555) 010-0199").expect("valid"),
            "+15550100199"
        );
        assert_eq!(normalize_phone_number("030.1234").expect("valid"), "0301234");
    }

    #[test]
    fn rejects_letters_and_misplaced_plus() {
        assert!(matches!(
            normalize_phone_number("555-CALL"),
            Err(ContactsError::Validation { .. })
        ));
        assert!(normalize_phone_number("12+34").is_err());
        assert!(normalize_phone_number("   ").is_err());
        assert!(normalize_phone_number("+()").is_err());
    }

    #[test]
    fn builds_call_and_message_uris() {
        assert_eq!(
            action_uri(ContactAction::Call, "+44 20 7946 0958").expect("uri"),
            "tel:+442079460958"
        );
        assert_eq!(
            action_uri(ContactAction::Message, "111").expect("uri"),
            "sms:111"
        );
        assert_eq!(
            ContactAction::Message.required_permission(),
            Permission::SendSms
        );
    }

    #[test]
    fn new_contact_requires_name_and_number() {
        let created = validate_new_contact("  Diana ", " 222 ").expect("valid");
        assert_eq!(created.name, "Diana");
        assert_eq!(created.phone_numbers, vec!["222".to_string()]);

        let err = validate_new_contact(" ", "222").expect_err("blank name");
        assert_eq!(err.to_string(), "invalid name: must not be empty");
        assert!(validate_new_contact("Diana", "").is_err());
    }
}

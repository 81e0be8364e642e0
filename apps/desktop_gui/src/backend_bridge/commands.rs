//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    /// Read the address book; `seq` comes from the session's load ticket.
    LoadContacts {
        seq: u64,
    },
    CreateContact {
        name: String,
        phone_number: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadContacts { .. } => "load_contacts",
            BackendCommand::CreateContact { .. } => "create_contact",
        }
    }
}

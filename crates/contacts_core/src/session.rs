//! Screen-scoped owner of the master and display lists.
//!
//! Loads run elsewhere (a worker thread or task) and come back through
//! [`ContactsSession::apply_load`]. Each load is tagged with a sequence number
//! when it is issued; only the most recently issued load may replace the
//! master list, so a slow stale read can never clobber a newer one. Filtering
//! is synchronous and always recomputed from the master list.

use shared::{
    domain::{Contact, DisplayEntry, Permission},
    error::ContactsError,
};
use tracing::{debug, info, warn};

use crate::{filter::filter_and_group, grouping::sort_by_name, permissions::PermissionGate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Rebuilds a ticket from a sequence number carried across a channel.
    pub fn from_seq(seq: u64) -> Self {
        Self { seq }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { contacts: usize },
    Stale { seq: u64, latest: u64 },
    Discarded,
    Failed(ContactsError),
}

#[derive(Debug, Default)]
pub struct ContactsSession {
    master: Vec<Contact>,
    query: String,
    display: Vec<DisplayEntry>,
    last_issued: u64,
    in_flight: Option<u64>,
    torn_down: bool,
}

impl ContactsSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for a fresh provider read, or refuses when the read
    /// permission is missing. The caller performs the read.
    pub fn begin_load<G>(&mut self, gate: &G) -> Result<LoadTicket, ContactsError>
    where
        G: PermissionGate + ?Sized,
    {
        if !gate.is_granted(Permission::ReadContacts) {
            warn!("contact load refused: read permission not granted");
            return Err(ContactsError::PermissionDenied(Permission::ReadContacts));
        }

        self.last_issued += 1;
        self.in_flight = Some(self.last_issued);
        debug!(seq = self.last_issued, "contact load issued");
        Ok(LoadTicket {
            seq: self.last_issued,
        })
    }

    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Contact>, ContactsError>,
    ) -> LoadOutcome {
        if self.torn_down {
            debug!(seq = ticket.seq, "contact load discarded after teardown");
            return LoadOutcome::Discarded;
        }
        if ticket.seq != self.last_issued {
            debug!(
                seq = ticket.seq,
                latest = self.last_issued,
                "stale contact load ignored"
            );
            return LoadOutcome::Stale {
                seq: ticket.seq,
                latest: self.last_issued,
            };
        }
        self.in_flight = None;

        match result {
            Ok(mut contacts) => {
                sort_by_name(&mut contacts);
                self.master = contacts;
                self.recompute_display();
                info!(
                    seq = ticket.seq,
                    count = self.master.len(),
                    "contact list replaced"
                );
                LoadOutcome::Applied {
                    contacts: self.master.len(),
                }
            }
            Err(err) => {
                warn!(seq = ticket.seq, "contact load failed: {err}");
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Clears the in-flight marker for a load whose request never reached a
    /// worker, so a retry can be issued.
    pub fn abandon(&mut self, ticket: LoadTicket) {
        if self.in_flight == Some(ticket.seq) {
            debug!(seq = ticket.seq, "contact load abandoned");
            self.in_flight = None;
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.recompute_display();
    }

    /// Drops any in-flight load; later results are discarded.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.in_flight = None;
    }

    pub fn display(&self) -> &[DisplayEntry] {
        &self.display
    }

    pub fn master(&self) -> &[Contact] {
        &self.master
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn recompute_display(&mut self) {
        self.display = filter_and_group(&self.query, &self.master);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

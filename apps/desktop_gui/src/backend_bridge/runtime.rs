//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use contacts_core::{create_contact, load_contacts};
use crossbeam_channel::{Receiver, Sender};
use shared::{domain::Contact, error::ContactsError};
use storage::Storage;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(database_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || run_worker(database_url, cmd_rx, ui_tx));
}

fn run_worker(database_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: failed to build runtime: {err}"),
            )));
            tracing::error!("failed to build backend runtime: {err}");
            return;
        }
    };

    runtime.block_on(async move {
        // Without a store every load answers with a provider failure.
        let storage = match Storage::new(&database_url).await {
            Ok(storage) => Some(storage),
            Err(err) => {
                tracing::error!(database_url = %database_url, "failed to open contact store: {err:#}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("could not open contact store '{database_url}': {err:#}"),
                )));
                None
            }
        };
        let _ = ui_tx.try_send(UiEvent::BackendReady);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                BackendCommand::LoadContacts { seq } => {
                    tracing::info!(seq, "backend: load_contacts");
                    let Some(storage) = storage.clone() else {
                        deliver_load(
                            &ui_tx,
                            seq,
                            Err(ContactsError::ProviderQuery(
                                "contact store unavailable".to_string(),
                            )),
                        );
                        continue;
                    };
                    // Loads may overlap; the UI session drops whichever result is stale.
                    let ui_tx = ui_tx.clone();
                    tokio::spawn(async move {
                        let result = load_contacts(&storage).await;
                        if let Err(err) = &result {
                            tracing::error!(seq, "backend: load_contacts failed: {err}");
                        }
                        deliver_load(&ui_tx, seq, result);
                    });
                }
                BackendCommand::CreateContact { name, phone_number } => {
                    tracing::info!("backend: create_contact");
                    let Some(storage) = storage.as_ref() else {
                        let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                            UiErrorContext::CreateContact,
                            "contact store unavailable",
                        )));
                        continue;
                    };
                    match create_contact(storage, &name, &phone_number).await {
                        Ok(contact_id) => {
                            let _ = ui_tx.try_send(UiEvent::ContactCreated { contact_id, name });
                        }
                        Err(err) => {
                            tracing::error!("backend: create_contact failed: {err}");
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_contacts_error(
                                UiErrorContext::CreateContact,
                                &err,
                            )));
                        }
                    }
                }
            }
        }
        tracing::info!("backend: command channel closed, worker exiting");
    });
}

/// Blocks while the UI queue is full: a dropped result would leave the
/// session waiting on this load forever.
fn deliver_load(
    ui_tx: &Sender<UiEvent>,
    seq: u64,
    result: Result<Vec<Contact>, ContactsError>,
) {
    if ui_tx.send(UiEvent::ContactsLoaded { seq, result }).is_err() {
        tracing::warn!(seq, "backend: ui receiver closed, load result dropped");
    }
}

use std::path::PathBuf;

use arboard::Clipboard;
use contacts_core::{
    action_uri, validate_new_contact, ConfiguredPermissions, Consent, ContactAction,
    ContactsSession, LoadOutcome, LoadTicket, PermissionGate, REQUIRED_PERMISSIONS,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{Contact, DisplayEntry, Permission, PermissionState},
    error::ContactsError,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::widgets;

pub const SETTINGS_STORAGE_KEY: &str = "desktop_gui.view_preferences";

const MIN_TEXT_SCALE: f32 = 0.8;
const MAX_TEXT_SCALE: f32 = 1.6;

pub struct StartupConfig {
    pub database_url: String,
    pub config_path: PathBuf,
    pub permissions: ConfiguredPermissions,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPreferences {
    pub text_scale: f32,
    pub show_initial_badges: bool,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            text_scale: 1.0,
            show_initial_badges: true,
        }
    }
}

impl ViewPreferences {
    fn sanitized(mut self) -> Self {
        if !self.text_scale.is_finite() {
            self.text_scale = 1.0;
        }
        self.text_scale = self.text_scale.clamp(MIN_TEXT_SCALE, MAX_TEXT_SCALE);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

#[derive(Debug, Default)]
struct CreateContactForm {
    name: String,
    phone_number: String,
    error: Option<String>,
    submitted: bool,
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    session: ContactsSession,
    permissions: ConfiguredPermissions,
    config_path: PathBuf,
    database_url: String,

    query_input: String,
    selected_contact: Option<Contact>,
    create_form: Option<CreateContactForm>,

    status: String,
    status_banner: Option<StatusBanner>,
    permission_prompt_open: bool,
    settings_dialog_open: bool,
    preferences_open: bool,

    preferences: ViewPreferences,
}

impl DesktopGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
        preferences: Option<ViewPreferences>,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            session: ContactsSession::new(),
            permissions: startup.permissions,
            config_path: startup.config_path,
            database_url: startup.database_url,
            query_input: String::new(),
            selected_contact: None,
            create_form: None,
            status: "Starting...".to_string(),
            status_banner: None,
            permission_prompt_open: false,
            settings_dialog_open: false,
            preferences_open: false,
            preferences: preferences.unwrap_or_default().sanitized(),
        };
        app.bootstrap();
        app
    }

    /// Startup permission pass: load straight away when reading is allowed,
    /// otherwise ask (or point at settings when asking is no longer possible).
    fn bootstrap(&mut self) {
        let report = self.permissions.report(&REQUIRED_PERMISSIONS);
        tracing::info!(
            granted = report.granted.len(),
            denied = report.denied.len(),
            permanently_denied = report.permanently_denied.len(),
            "startup permission check"
        );

        if report.any_permanently_denied() {
            self.settings_dialog_open = true;
        } else if !report.denied.is_empty() {
            self.permission_prompt_open = true;
        }

        if self.permissions.is_granted(Permission::ReadContacts) {
            self.request_load();
        } else {
            self.status = "Waiting for permission to read contacts".to_string();
        }
    }

    fn request_load(&mut self) {
        match self.session.begin_load(&self.permissions) {
            Ok(ticket) => {
                if dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::LoadContacts { seq: ticket.seq() },
                    &mut self.status,
                ) {
                    self.status = "Loading contacts...".to_string();
                } else {
                    self.session.abandon(ticket);
                    self.status_banner = Some(StatusBanner {
                        severity: StatusBannerSeverity::Error,
                        message: self.status.clone(),
                    });
                }
            }
            Err(err) => self.report_contacts_error(UiErrorContext::LoadContacts, &err),
        }
    }

    fn answer_permission_prompt(&mut self, consent: Consent) {
        let report = self.permissions.request(&REQUIRED_PERMISSIONS, consent);
        self.permission_prompt_open = false;
        tracing::info!(?consent, all_granted = report.all_granted(), "permission prompt answered");

        if report.any_permanently_denied() {
            self.settings_dialog_open = true;
        }
        if self.permissions.is_granted(Permission::ReadContacts) {
            self.request_load();
        } else {
            self.status = "Contacts cannot be shown without permission".to_string();
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Warning,
                message: "Permission to read contacts was not granted.".to_string(),
            });
        }
    }

    /// Returns true when `permission` is granted; otherwise routes the user to
    /// the prompt or the settings dialog.
    fn ensure_permission(&mut self, permission: Permission) -> bool {
        match self.permissions.state(permission) {
            PermissionState::Granted => true,
            PermissionState::PermanentlyDenied => {
                self.status = format!("Permission to {} is blocked", permission.label());
                self.settings_dialog_open = true;
                false
            }
            PermissionState::NotDetermined | PermissionState::Denied => {
                self.status = format!("Permission to {} is required", permission.label());
                self.permission_prompt_open = true;
                false
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::BackendReady => {
                    if !self.session.is_loading() {
                        self.status = "Contact store ready".to_string();
                    }
                }
                UiEvent::ContactsLoaded { seq, result } => {
                    match self.session.apply_load(LoadTicket::from_seq(seq), result) {
                        LoadOutcome::Applied { contacts } => {
                            self.status = format!(
                                "{contacts} contacts, loaded at {}",
                                chrono::Local::now().format("%H:%M:%S")
                            );
                            self.status_banner = None;
                            self.refresh_selection();
                        }
                        LoadOutcome::Stale { seq, latest } => {
                            tracing::debug!(seq, latest, "ui: dropped stale contact load");
                        }
                        LoadOutcome::Discarded => {}
                        LoadOutcome::Failed(err) => {
                            self.report_contacts_error(UiErrorContext::LoadContacts, &err);
                        }
                    }
                }
                UiEvent::ContactCreated { contact_id, name } => {
                    tracing::info!(contact_id = contact_id.0, "ui: contact created");
                    self.create_form = None;
                    self.status = format!("Created {name}");
                    self.request_load();
                }
                UiEvent::Error(err) => self.show_error(err),
            }
        }
    }

    fn report_contacts_error(&mut self, context: UiErrorContext, err: &ContactsError) {
        if let ContactsError::PermissionDenied(permission) = err {
            self.ensure_permission(*permission);
        }
        self.show_error(UiError::from_contacts_error(context, err));
    }

    fn show_error(&mut self, err: UiError) {
        self.status = format!("{} error: {}", err_label(err.category()), err.message());

        if err.context() == UiErrorContext::CreateContact {
            if let Some(form) = self.create_form.as_mut() {
                form.error = Some(err.message().to_string());
                form.submitted = false;
            }
        }

        if err.needs_settings_redirect() {
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Warning,
                message: self.status.clone(),
            });
        } else if matches!(
            err.context(),
            UiErrorContext::BackendStartup
                | UiErrorContext::LoadContacts
                | UiErrorContext::LaunchAction
        ) {
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Error,
                message: self.status.clone(),
            });
        }
    }

    /// Keeps the detail view pointed at the reloaded copy of the contact.
    fn refresh_selection(&mut self) {
        if let Some(selected) = self.selected_contact.take() {
            self.selected_contact = self
                .session
                .master()
                .iter()
                .find(|c| c.id == selected.id)
                .cloned();
        }
    }

    fn launch_action(&mut self, action: ContactAction, contact: &Contact) {
        if !self.ensure_permission(action.required_permission()) {
            return;
        }

        let result = action_uri(action, &contact.phone_number).and_then(|uri| {
            open::that(&uri).map_err(|err| ContactsError::ActionLaunch {
                target: uri.clone(),
                message: err.to_string(),
            })?;
            Ok(uri)
        });

        match result {
            Ok(uri) => {
                tracing::info!(action = action.label(), "ui: handed {uri} to the OS");
                self.status = format!("{} {}", action.label(), contact.name);
            }
            Err(err) => self.report_contacts_error(UiErrorContext::LaunchAction, &err),
        }
    }

    fn copy_number(&mut self, contact: &Contact) {
        let copied = Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(contact.phone_number.clone()));
        self.status = match copied {
            Ok(()) => format!("Copied {}", contact.phone_number),
            Err(err) => format!("Clipboard unavailable: {err}"),
        };
    }

    fn open_create_form(&mut self) {
        if self.ensure_permission(Permission::WriteContacts) {
            self.create_form = Some(CreateContactForm::default());
        }
    }

    fn submit_create_form(&mut self) {
        let Some(form) = self.create_form.as_ref() else {
            return;
        };
        let validated = validate_new_contact(&form.name, &form.phone_number);

        match validated {
            Ok(new_contact) => {
                if !self.ensure_permission(Permission::WriteContacts) {
                    return;
                }
                let phone_number = new_contact.phone_numbers.first().cloned().unwrap_or_default();
                let queued = dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::CreateContact {
                        name: new_contact.name,
                        phone_number,
                    },
                    &mut self.status,
                );
                if let Some(form) = self.create_form.as_mut() {
                    form.error = None;
                    form.submitted = queued;
                }
            }
            Err(err) => {
                if let Some(form) = self.create_form.as_mut() {
                    form.error = Some(err.to_string());
                }
            }
        }
    }

    fn open_settings_file(&mut self) {
        match open::that(&self.config_path) {
            Ok(()) => {
                self.settings_dialog_open = false;
                self.status = format!(
                    "Opened {}; restart after changing permissions",
                    self.config_path.display()
                );
            }
            Err(err) => {
                self.show_error(UiError::from_contacts_error(
                    UiErrorContext::General,
                    &ContactsError::ActionLaunch {
                        target: self.config_path.display().to_string(),
                        message: err.to_string(),
                    },
                ));
            }
        }
    }

    fn accent(&self, ui: &egui::Ui) -> egui::Color32 {
        ui.visuals().selection.bg_fill
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
                StatusBannerSeverity::Warning => (
                    egui::Color32::from_rgb(104, 84, 40),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(170, 140, 70)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(6.0);
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("contacts_top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Contacts");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙").on_hover_text("View preferences").clicked() {
                        self.preferences_open = !self.preferences_open;
                    }
                    let reload = ui.add_enabled(
                        !self.session.is_loading(),
                        egui::Button::new("⟳").corner_radius(egui::CornerRadius::same(4)),
                    );
                    if reload.on_hover_text("Reload contacts").clicked() {
                        self.request_load();
                    }
                    if ui.button("+ New contact").clicked() {
                        self.open_create_form();
                    }
                });
            });
            ui.add_space(4.0);
            let search = ui.add(
                egui::TextEdit::singleline(&mut self.query_input)
                    .hint_text("Search contacts")
                    .desired_width(f32::INFINITY),
            );
            if search.changed() {
                self.session.set_query(self.query_input.clone());
            }
            ui.add_space(6.0);
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("contacts_status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.session.is_loading() {
                    ui.spinner();
                }
                ui.label(egui::RichText::new(&self.status).small().weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(&self.database_url).small().weak());
                });
            });
        });
    }

    fn show_contact_list(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);

            if self.session.display().is_empty() {
                ui.centered_and_justified(|ui| {
                    let text = if self.session.is_loading() {
                        "Loading contacts..."
                    } else if !self.session.query().is_empty() {
                        "No contacts match your search"
                    } else if self.permissions.is_granted(Permission::ReadContacts) {
                        "No contacts with phone numbers"
                    } else {
                        "Contacts permission is needed to show the list"
                    };
                    ui.label(egui::RichText::new(text).weak());
                });
                return;
            }

            let accent = self.accent(ui);
            let text_scale = self.preferences.text_scale;
            let show_badges = self.preferences.show_initial_badges;
            let selected_id = self.selected_contact.as_ref().map(|c| c.id);
            let mut clicked: Option<Contact> = None;

            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    for entry in self.session.display() {
                        match entry {
                            DisplayEntry::Header { letter } => {
                                widgets::section_header(ui, letter, text_scale, accent);
                            }
                            DisplayEntry::ContactRow { contact } => {
                                let response = widgets::contact_row(
                                    ui,
                                    contact,
                                    selected_id == Some(contact.id),
                                    show_badges,
                                    text_scale,
                                    accent,
                                );
                                if response.clicked() {
                                    clicked = Some(contact.clone());
                                }
                            }
                        }
                    }
                });

            if clicked.is_some() {
                self.selected_contact = clicked;
            }
        });
    }

    fn show_contact_detail(&mut self, ctx: &egui::Context) {
        let Some(contact) = self.selected_contact.clone() else {
            return;
        };
        let mut open = true;
        let mut requested: Option<ContactAction> = None;
        let mut copy = false;

        egui::Window::new("Contact")
            .id(egui::Id::new("contact_detail"))
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 96.0])
            .show(ctx, |ui| {
                ui.heading(if contact.name.trim().is_empty() {
                    "(no name)"
                } else {
                    contact.name.as_str()
                });
                ui.label(egui::RichText::new(&contact.phone_number).monospace());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    for action in [ContactAction::Call, ContactAction::Message] {
                        if ui.button(action.label()).clicked() {
                            requested = Some(action);
                        }
                    }
                    if ui.button("Copy number").clicked() {
                        copy = true;
                    }
                });
            });

        if let Some(action) = requested {
            self.launch_action(action, &contact);
        }
        if copy {
            self.copy_number(&contact);
        }
        if !open {
            self.selected_contact = None;
        }
    }

    fn show_create_form(&mut self, ctx: &egui::Context) {
        let Some(form) = self.create_form.as_mut() else {
            return;
        };
        let mut open = true;
        let mut submit = false;

        egui::Window::new("New contact")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("new_contact_grid")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Name");
                        ui.text_edit_singleline(&mut form.name);
                        ui.end_row();
                        ui.label("Phone");
                        let phone = ui.text_edit_singleline(&mut form.phone_number);
                        if phone.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            submit = true;
                        }
                        ui.end_row();
                    });
                if let Some(error) = &form.error {
                    ui.colored_label(ui.visuals().error_fg_color, error);
                }
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    let save = ui.add_enabled(!form.submitted, egui::Button::new("Save"));
                    if save.clicked() {
                        submit = true;
                    }
                    if form.submitted {
                        ui.spinner();
                    }
                });
            });

        if submit {
            self.submit_create_form();
        }
        if !open {
            self.create_form = None;
        }
    }

    fn show_permission_prompt(&mut self, ctx: &egui::Context) {
        if !self.permission_prompt_open {
            return;
        }
        let mut answer: Option<Consent> = None;

        egui::Window::new("Allow access?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Contacts needs these permissions:");
                for permission in REQUIRED_PERMISSIONS {
                    let state = self.permissions.state(permission);
                    let mark = if state.is_granted() { "✔" } else { "•" };
                    ui.label(format!("{mark} {}", permission.label()));
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Allow").clicked() {
                        answer = Some(Consent::Allow);
                    }
                    if ui.button("Deny").clicked() {
                        answer = Some(Consent::Deny);
                    }
                    if ui.button("Don't ask again").clicked() {
                        answer = Some(Consent::DontAskAgain);
                    }
                });
            });

        if let Some(consent) = answer {
            self.answer_permission_prompt(consent);
        }
    }

    fn show_settings_dialog(&mut self, ctx: &egui::Context) {
        if !self.settings_dialog_open {
            return;
        }
        let blocked = self.permissions.report(&REQUIRED_PERMISSIONS).permanently_denied;
        let mut go_to_settings = false;
        let mut cancel = false;

        egui::Window::new("Need Permissions")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Some permissions were denied and can only be changed in settings:");
                for permission in &blocked {
                    ui.label(format!("• {}", permission.label()));
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Go to settings").clicked() {
                        go_to_settings = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if go_to_settings {
            self.open_settings_file();
        }
        if cancel {
            self.settings_dialog_open = false;
        }
    }

    fn show_preferences(&mut self, ctx: &egui::Context) {
        if !self.preferences_open {
            return;
        }
        let mut open = true;
        egui::Window::new("View")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add(
                    egui::Slider::new(
                        &mut self.preferences.text_scale,
                        MIN_TEXT_SCALE..=MAX_TEXT_SCALE,
                    )
                    .text("Text size"),
                );
                ui.checkbox(&mut self.preferences.show_initial_badges, "Initial badges");
            });
        self.preferences_open = open;
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) && !self.session.is_torn_down() {
            tracing::info!("ui: window closing, dropping pending loads");
            self.session.teardown();
        }

        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        self.show_contact_list(ctx);
        self.show_contact_detail(ctx);
        self.show_create_form(ctx);
        self.show_preferences(ctx);
        self.show_permission_prompt(ctx);
        self.show_settings_dialog(ctx);

        if self.session.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(30));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(200));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(serialized) = serde_json::to_string(&self.preferences) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

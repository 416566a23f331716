use std::num::NonZeroU32;

use client_core::{
    pagination::derive, ClientSettings, FetchState, ListBody, SessionSnapshot, UserListView,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{command_for_intent, sanitize_age, UiIntent};

pub const SETTINGS_STORAGE_KEY: &str = "user_directory_gui_settings";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedDesktopSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl PersistedDesktopSettings {
    pub fn page_size(&self) -> Option<NonZeroU32> {
        self.page_size.and_then(NonZeroU32::new)
    }
}

pub struct UserDirectoryApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    name_input: String,
    age_input: String,
    page_size_options: Vec<NonZeroU32>,
    view: UserListView,
    /// Newest request id rendered so far.
    shown_request: u64,
    status: String,
    fatal_banner: Option<String>,
}

impl UserDirectoryApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &ClientSettings,
        persisted_settings: Option<PersistedDesktopSettings>,
    ) -> Self {
        let query = settings.initial_query();
        let idle = SessionSnapshot {
            page_info: derive(&query, 0),
            query,
            fetch: FetchState::Idle,
            request_id: 0,
        };
        let mut app = Self {
            cmd_tx,
            ui_rx,
            name_input: String::new(),
            age_input: String::new(),
            page_size_options: settings.page_size_options.clone(),
            view: UserListView::from_snapshot(&idle, &settings.page_size_options),
            shown_request: 0,
            status: "Not connected".to_string(),
            fatal_banner: None,
        };

        let restored_size = persisted_settings
            .as_ref()
            .and_then(PersistedDesktopSettings::page_size);
        let startup_cmd = match restored_size {
            Some(size) if size != settings.initial_page_size => {
                BackendCommand::Apply(client_core::QueryAction::SetLimit(size))
            }
            _ => BackendCommand::Refresh,
        };
        dispatch_backend_command(&app.cmd_tx, startup_cmd, &mut app.status);
        app
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Session(snapshot) => {
                    if snapshot.request_id < self.shown_request {
                        tracing::debug!(
                            request_id = snapshot.request_id,
                            shown_request = self.shown_request,
                            "ignoring out-of-order session snapshot"
                        );
                        continue;
                    }
                    self.shown_request = snapshot.request_id;
                    if let FetchState::Failure(message) = &snapshot.fetch {
                        tracing::debug!(request_id = snapshot.request_id, "fetch failed: {message}");
                    }
                    self.view = UserListView::from_snapshot(&snapshot, &self.page_size_options);
                }
                UiEvent::Error(err) => {
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                    if err.is_fatal() {
                        self.fatal_banner = Some(self.status.clone());
                    }
                }
            }
        }
    }

    fn handle_intent(&mut self, intent: UiIntent) {
        if let Some(cmd) = command_for_intent(intent, &self.view.pagination) {
            dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
        }
    }

    fn show_filters(&mut self, ctx: &egui::Context, intents: &mut Vec<UiIntent>) {
        egui::TopBottomPanel::top("query_filters").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let name = ui.add(
                    egui::TextEdit::singleline(&mut self.name_input)
                        .hint_text("Name")
                        .desired_width(200.0),
                );
                if name.changed() {
                    intents.push(UiIntent::NameEdited(self.name_input.clone()));
                }

                let age = ui.add(
                    egui::TextEdit::singleline(&mut self.age_input)
                        .hint_text("Age")
                        .desired_width(80.0),
                );
                if age.changed() {
                    self.age_input = sanitize_age(&self.age_input);
                    intents.push(UiIntent::AgeEdited(self.age_input.clone()));
                }

                if ui.button("Reset").clicked() {
                    self.name_input.clear();
                    self.age_input.clear();
                    intents.push(UiIntent::ResetClicked);
                }
            });
            ui.add_space(6.0);
        });
    }

    fn show_footer(&mut self, ctx: &egui::Context, intents: &mut Vec<UiIntent>) {
        let pagination = self.view.pagination.clone();
        egui::TopBottomPanel::bottom("pagination_footer").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("By page:");
                let mut selected = pagination.limit;
                egui::ComboBox::from_id_salt("page_size")
                    .selected_text(selected.to_string())
                    .show_ui(ui, |ui| {
                        for option in &pagination.page_size_options {
                            ui.selectable_value(&mut selected, *option, option.to_string());
                        }
                    });
                if selected != pagination.limit {
                    intents.push(UiIntent::PageSizeSelected(selected));
                }

                if ui
                    .add_enabled(pagination.has_prev, egui::Button::new("prev"))
                    .clicked()
                {
                    intents.push(UiIntent::PrevPageClicked);
                }
                ui.label(format!("page: {}", pagination.page));
                if ui
                    .add_enabled(pagination.has_next, egui::Button::new("next"))
                    .clicked()
                {
                    intents.push(UiIntent::NextPageClicked);
                }

                ui.separator();
                ui.small(&self.status);
            });
            ui.add_space(6.0);
        });
    }

    fn show_user_list(&mut self, ctx: &egui::Context, intents: &mut Vec<UiIntent>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(banner) = &self.fatal_banner {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), banner);
                ui.separator();
            }

            match &self.view.body {
                ListBody::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(client_core::view::LOADING_LABEL);
                    });
                }
                ListBody::Error(banner) => {
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 80), banner);
                    if ui.button("Retry").clicked() {
                        intents.push(UiIntent::RetryClicked);
                    }
                }
                ListBody::Users(rows) => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        for row in rows {
                            ui.label(row);
                        }
                    });
                }
                ListBody::Empty(placeholder) => {
                    ui.weak(*placeholder);
                }
            }
        });
    }
}

impl eframe::App for UserDirectoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut intents = Vec::new();
        self.show_filters(ctx, &mut intents);
        self.show_footer(ctx, &mut intents);
        self.show_user_list(ctx, &mut intents);
        for intent in intents {
            self.handle_intent(intent);
        }

        if matches!(self.view.body, ListBody::Loading) {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedDesktopSettings {
            page_size: Some(self.view.pagination.limit.get()),
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

use crate::backend::LogFile;
use crate::chat::{AnalysisMode, ChatMessage, ChatSession, Role};
use crate::context::{DashboardContext, Server};
use crate::event::AppEvent;
use crate::theme::Theme;
use crate::uploader::{SelectionRound, UploadStatus, Uploader};
use crate::worker::BackendWorker;
use chrono::Local;
use eframe::egui::{self, RichText, ScrollArea};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

pub struct LogboardApp {
    rx: Receiver<AppEvent>,
    worker: BackendWorker,
    backend_url: String,
    theme: Theme,
    visuals_applied: bool,
    context: DashboardContext,
    uploader: Uploader,
    chat: ChatSession,
    file_path: String,
    chat_input: String,
    rendered_messages: usize,
    diagnostics_log: Vec<String>,
}

impl LogboardApp {
    pub fn new(rx: Receiver<AppEvent>, worker: BackendWorker, backend_url: String) -> Self {
        Self {
            rx,
            worker,
            backend_url,
            theme: Theme::default(),
            visuals_applied: false,
            context: DashboardContext::new(),
            uploader: Uploader::new(),
            chat: ChatSession::new(),
            file_path: String::new(),
            chat_input: String::new(),
            rendered_messages: 0,
            diagnostics_log: Vec::new(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log.push(format!(
            "[{}] {}",
            Local::now().format("%H:%M:%S"),
            message.into()
        ));
    }

    fn load_file(&mut self, path: &Path) {
        match LogFile::from_path(path) {
            Ok(file) => {
                self.log_diagnostic(format!("loaded {} ({} bytes)", file.name, file.len()));
                self.file_path = path.display().to_string();
                self.uploader.set_file(file);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read log file");
                self.log_diagnostic(format!("failed to read {}: {err}", path.display()));
            }
        }
    }

    fn accept_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|input| input.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        if let Some(path) = file.path {
            self.load_file(&path);
        } else if let Some(bytes) = file.bytes {
            self.log_diagnostic(format!("dropped {} ({} bytes)", file.name, bytes.len()));
            self.file_path = file.name.clone();
            self.uploader.set_file(LogFile::new(file.name, bytes.to_vec()));
        }
    }

    fn submit_upload(&mut self) {
        match self.uploader.begin_submit() {
            Ok(request) => self.worker.upload(request),
            Err(err) => self.log_diagnostic(format!("upload not sent: {err}")),
        }
    }

    fn confirm_selection(&mut self) {
        match self.uploader.begin_confirm() {
            Ok(request) => self.worker.upload(request),
            Err(err) => self.log_diagnostic(format!("selection not sent: {err}")),
        }
    }

    fn send_chat(&mut self) {
        if let Some(request) = self.chat.begin_send(&self.chat_input, &self.context) {
            self.chat_input.clear();
            self.chat.scroll_mut().scroll_to_bottom();
            self.worker.chat(request);
        }
    }

    fn switch_mode(&mut self, mode: AnalysisMode) {
        if let Some(request) = self.chat.set_mode_and_prompt(mode, &self.context) {
            self.worker.chat(request);
        }
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::UploadFinished(result) => {
                if let Err(err) = &result {
                    self.log_diagnostic(format!("upload failed: {err}"));
                }
                self.uploader.finish(result, &mut self.context);
                if self.chat.observe_context(&self.context) {
                    self.log_diagnostic(format!(
                        "dashboard ready: {}",
                        self.context.selection().dashboard
                    ));
                }
            }
            AppEvent::ChatFinished(result) => {
                if let Err(err) = &result {
                    self.log_diagnostic(format!("chat failed: {err}"));
                }
                self.chat.finish_send(result);
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong(RichText::new("Logboard").color(self.theme.accent));
                ui.separator();
                ui.label(RichText::new("Log File Visualization").color(self.theme.text_secondary));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(&self.backend_url)
                            .small()
                            .color(self.theme.text_secondary),
                    );
                });
            });
        });
    }

    fn render_uploader_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("uploader_panel")
            .resizable(true)
            .default_width(430.0)
            .show(ctx, |ui| {
                ScrollArea::vertical()
                    .id_salt("uploader_scroll")
                    .show(ui, |ui| {
                        let card = self.theme.card_frame();
                        card.show(ui, |ui| {
                            ui.heading("Upload Request Log File");
                            ui.label(
                                RichText::new(
                                    "Upload a request log file to create a visualization dashboard",
                                )
                                .color(self.theme.text_secondary),
                            );
                            ui.add_space(self.theme.spacing_8);
                            self.render_upload_form(ui);
                        });

                        if self.uploader.status() == UploadStatus::Selection {
                            ui.add_space(self.theme.spacing_12);
                            self.render_selection_step(ui);
                        }

                        if !matches!(
                            self.uploader.status(),
                            UploadStatus::Idle | UploadStatus::Selection
                        ) {
                            ui.add_space(self.theme.spacing_12);
                            self.render_status(ui);
                        }

                        ui.add_space(self.theme.spacing_12);
                        egui::CollapsingHeader::new("Diagnostics")
                            .default_open(false)
                            .show(ui, |ui| {
                                for entry in &self.diagnostics_log {
                                    ui.label(RichText::new(entry).small());
                                }
                            });
                    });
            });
    }

    fn render_upload_form(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Server").color(self.theme.text_secondary));
        let selected_text = self
            .uploader
            .server()
            .map(Server::as_str)
            .unwrap_or("Select a server");
        egui::ComboBox::from_id_salt("server_select")
            .selected_text(selected_text)
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for server in Server::ALL {
                    ui.selectable_value(self.uploader.server_mut(), Some(server), server.as_str());
                }
            });

        ui.label(RichText::new("Dashboard Name").color(self.theme.text_secondary));
        ui.add(
            egui::TextEdit::singleline(self.uploader.dashboard_name_mut())
                .hint_text("Enter dashboard name")
                .desired_width(f32::INFINITY),
        );

        ui.label(RichText::new("Log File").color(self.theme.text_secondary));
        let mut load_now = false;
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.file_path)
                    .hint_text("Path to log file, or drop it on the window")
                    .desired_width(ui.available_width() - 70.0),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                load_now = true;
            }
            load_now |= ui
                .add_enabled(!self.file_path.trim().is_empty(), egui::Button::new("Load"))
                .clicked();
        });
        if load_now {
            let path = PathBuf::from(self.file_path.trim());
            self.load_file(&path);
        }
        if let Some(file) = self.uploader.file() {
            ui.label(
                RichText::new(format!("{} · {} bytes", file.name, file.len()))
                    .small()
                    .color(self.theme.text_secondary),
            );
        }

        ui.add_space(self.theme.spacing_8);
        let loading = self.uploader.is_busy();
        let clicked = ui
            .horizontal(|ui| {
                let clicked = ui
                    .add_enabled(
                        self.uploader.can_submit(),
                        egui::Button::new(RichText::new("Upload File").strong())
                            .fill(self.theme.blue),
                    )
                    .clicked();
                if loading {
                    ui.add(egui::Spinner::new());
                }
                clicked
            })
            .inner;
        if clicked {
            self.submit_upload();
        }
    }

    fn render_selection_step(&mut self, ui: &mut egui::Ui) {
        let Some(round) = self.uploader.round().cloned() else {
            return;
        };
        let theme = self.theme.clone();
        let server = self.uploader.server();

        theme.step_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Step 2").color(theme.accent).strong());
                let title = match &round {
                    SelectionRound::Metric { .. } => "Select a metric to visualize:".to_string(),
                    SelectionRound::Category { .. } => {
                        "Select a category to visualize:".to_string()
                    }
                    SelectionRound::Columns(_) => {
                        let noun = if server == Some(Server::Ccn) {
                            "counters"
                        } else {
                            "metrics"
                        };
                        format!("Select {noun} to visualize:")
                    }
                };
                ui.strong(title);
            });
            ui.add_space(theme.spacing_8);

            match &round {
                SelectionRound::Metric { options, selected } => {
                    for metric in options {
                        let checked = selected.as_deref() == Some(metric.as_str());
                        if ui.radio(checked, metric.as_str()).clicked() {
                            self.uploader.choose_metric(metric);
                        }
                    }
                }
                SelectionRound::Category { options, selected } => {
                    for category in options {
                        let checked = selected.as_deref() == Some(category.full.as_str());
                        ui.horizontal(|ui| {
                            if ui.radio(checked, category.display.as_str()).clicked() {
                                self.uploader.choose_category(&category.full);
                            }
                            ui.label(
                                RichText::new(&category.full)
                                    .small()
                                    .color(theme.text_secondary),
                            );
                        });
                    }
                }
                SelectionRound::Columns(_) => self.render_column_picker(ui, &theme),
            }

            ui.add_space(theme.spacing_12);
            let create = ui
                .add_enabled(
                    self.uploader.can_confirm(),
                    egui::Button::new(RichText::new("Create Dashboard").strong()).fill(theme.blue),
                )
                .clicked();
            if create {
                self.confirm_selection();
            }
        });
    }

    fn render_column_picker(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        let Some(picker) = self.uploader.column_picker_mut() else {
            return;
        };

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!(
                    "{} of {} selected",
                    picker.selected().len(),
                    picker.available().len()
                ))
                .color(theme.accent),
            );
            if !picker.selected().is_empty() && ui.small_button("Clear").clicked() {
                picker.deselect_all();
            }
            let toggle_label = if picker.all_selected() {
                "Unselect All"
            } else {
                "Select All"
            };
            if ui.small_button(toggle_label).clicked() {
                if picker.all_selected() {
                    picker.deselect_all();
                } else {
                    picker.select_all();
                }
            }
        });

        ui.horizontal(|ui| {
            let mut query = picker.search_query().to_string();
            let response = ui.add(
                egui::TextEdit::singleline(&mut query)
                    .hint_text("Search metrics...")
                    .desired_width(ui.available_width() - 40.0),
            );
            if response.changed() {
                picker.set_search_query(query);
            }
            if !picker.search_query().is_empty() && ui.small_button("✕").clicked() {
                picker.clear_search();
            }
        });

        let visible: Vec<String> = picker.filtered().into_iter().map(str::to_string).collect();
        ScrollArea::vertical()
            .id_salt("column_picker")
            .max_height(240.0)
            .show(ui, |ui| {
                if visible.is_empty() {
                    ui.label(
                        RichText::new("No metrics match your search").color(theme.text_secondary),
                    );
                }
                for column in &visible {
                    let mut checked = picker.is_selected(column);
                    if ui.checkbox(&mut checked, column.as_str()).changed() {
                        picker.set_selected(column, checked);
                    }
                }
            });

        ui.label(
            RichText::new(
                "Select the metrics you want to include in your visualization dashboard. You can select multiple items.",
            )
            .small()
            .color(theme.text_secondary),
        );
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        let status = self.uploader.status();
        let color = self.theme.status_color(status);
        let title = match status {
            UploadStatus::Error => "Error",
            UploadStatus::Success => "Success",
            _ => "Processing",
        };

        self.theme.step_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                if status == UploadStatus::Loading {
                    ui.add(egui::Spinner::new());
                }
                ui.label(RichText::new(title).color(color).strong().size(16.0));
            });
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(self.uploader.message()).color(self.theme.text_secondary));
                if status == UploadStatus::Success {
                    if let Some(url) = self.uploader.dashboard_url() {
                        ui.hyperlink_to("View Dashboard", url);
                    }
                }
            });
        });
    }

    fn render_assistant_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Dashboard Analysis Assistant");
            ui.separator();

            let mut chosen_mode = None;
            ui.horizontal(|ui| {
                for mode in AnalysisMode::ALL {
                    if ui
                        .selectable_label(self.chat.mode() == mode, mode.label())
                        .clicked()
                        && self.chat.mode() != mode
                    {
                        chosen_mode = Some(mode);
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("⬇").on_hover_text("Scroll to bottom").clicked() {
                        self.chat.scroll_mut().scroll_to_bottom();
                    }
                    if ui.small_button("⬆").on_hover_text("Scroll to top").clicked() {
                        self.chat.scroll_mut().scroll_to_top();
                    }
                });
            });
            if let Some(mode) = chosen_mode {
                self.switch_mode(mode);
            }
            ui.separator();

            self.render_transcript(ui);

            ui.separator();
            let ready = self.context.is_ready();
            let in_flight = self.chat.is_in_flight();
            let input_enabled = ready && !in_flight;
            let mut send_now = false;
            ui.horizontal(|ui| {
                let response = ui.add_enabled(
                    input_enabled,
                    egui::TextEdit::singleline(&mut self.chat_input)
                        .hint_text("Ask about the dashboard data...")
                        .desired_width(ui.available_width() - 60.0),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    send_now = true;
                }

                if in_flight {
                    ui.add(egui::Spinner::new());
                } else {
                    send_now |= ui
                        .add_enabled(
                            input_enabled && !self.chat_input.trim().is_empty(),
                            egui::Button::new("Send").fill(self.theme.blue),
                        )
                        .clicked();
                }
            });
            if send_now && input_enabled {
                self.send_chat();
            }

            if !ready {
                ui.label(
                    RichText::new("Upload a file to start analyzing your data")
                        .color(self.theme.text_secondary),
                );
            }
        });
    }

    fn render_transcript(&mut self, ui: &mut egui::Ui) {
        let transcript_height = (ui.available_height() - 90.0).max(120.0);
        let message_count = self.chat.messages().len();
        let follow = self.chat.scroll().auto_scroll() && message_count != self.rendered_messages;
        let jump_to_top = self.chat.scroll_mut().take_jump_to_top();

        let mut area = ScrollArea::vertical()
            .id_salt("chat_transcript")
            .max_height(transcript_height)
            .auto_shrink([false, false])
            .stick_to_bottom(self.chat.scroll().auto_scroll());
        if jump_to_top {
            area = area.vertical_scroll_offset(0.0);
        }

        let theme = &self.theme;
        let messages = self.chat.messages();
        area.show(ui, |ui| {
            for message in messages {
                render_message(ui, theme, message);
            }
            if follow {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }
        });
        self.rendered_messages = message_count;
    }
}

fn render_message(ui: &mut egui::Ui, theme: &Theme, message: &ChatMessage) {
    let (layout, fill, speaker) = match message.role {
        Role::User => (
            egui::Layout::top_down(egui::Align::Max),
            theme.user_bubble,
            "You",
        ),
        Role::Assistant => (
            egui::Layout::top_down(egui::Align::Min),
            theme.assistant_bubble,
            "Assistant",
        ),
    };

    ui.with_layout(layout, |ui| {
        theme.bubble_frame(fill).show(ui, |ui| {
            ui.set_max_width(ui.available_width() * 0.75);
            if message.is_typing {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new().size(12.0));
                    ui.label(RichText::new("thinking...").color(theme.text_secondary));
                });
            } else {
                ui.label(message.text.as_str());
            }
        });
        ui.label(
            RichText::new(format!("{speaker} · {}", message.timestamp))
                .small()
                .color(theme.text_secondary),
        );
    });
    ui.add_space(theme.spacing_8);
}

impl eframe::App for LogboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.visuals_applied {
            self.theme.apply_visuals(ctx);
            self.visuals_applied = true;
        }

        self.drain_events();
        self.accept_dropped_files(ctx);
        self.render_top_bar(ctx);
        self.render_uploader_panel(ctx);
        self.render_assistant_panel(ctx);

        if self.uploader.is_busy() || self.chat.is_in_flight() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

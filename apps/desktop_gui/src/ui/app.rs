use std::thread;
use std::time::Duration;

use chrono::Local;
use classifier_client::HttpClassifierClient;
use classify_core::{
    validated_submission, ClassifierClient, SessionContext, HISTORY_DISPLAY_LIMIT,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Submission;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{self, OutputPanelState};

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

/// A submission dispatched to the backend worker, held until its result
/// event comes back so it can be recorded into the session history.
struct PendingSubmission {
    submission: Submission,
    save_to_history: bool,
}

pub struct ClassifierGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    session: SessionContext,
    show_raw_output: bool,
    save_to_history: bool,

    output: OutputPanelState,
    pending_submission: Option<PendingSubmission>,

    status: String,
    status_banner: Option<StatusBanner>,
    backend_ready: bool,

    // Simple frame tick (used for debouncing and UI heuristics).
    tick: u64,
}

impl ClassifierGuiApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            session: SessionContext::new(),
            show_raw_output: false,
            save_to_history: true,
            output: OutputPanelState::Idle,
            pending_submission: None,
            status: "Starting backend worker...".to_string(),
            status_banner: None,
            backend_ready: false,
            tick: 0,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::BackendReady => {
                    self.backend_ready = true;
                    self.status = "Ready".to_string();
                }
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::ClassificationReady { raw } => self.on_classification_ready(raw),
                UiEvent::Error(err) => self.on_backend_error(err),
            }
        }
    }

    fn on_classification_ready(&mut self, raw: String) {
        // History is recorded as soon as the classifier answers; whether the
        // answer then parses is a separate concern.
        if let Some(pending) = self.pending_submission.take() {
            self.session
                .record_classification(&pending.submission, raw.clone(), pending.save_to_history);
        }

        self.output = reducer::on_classification_ready(&raw);
        match &self.output {
            OutputPanelState::Displayed { .. } => {
                self.status = "Classification complete".to_string();
            }
            _ => {
                self.status = "Classifier returned an unreadable response".to_string();
                self.status_banner = Some(StatusBanner {
                    severity: StatusBannerSeverity::Error,
                    message: "Invalid model response.".to_string(),
                });
            }
        }
    }

    fn on_backend_error(&mut self, err: UiError) {
        self.pending_submission = None;
        if err.context() == UiErrorContext::Classify {
            self.output = reducer::on_classification_failed(err.message().to_string());
        }
        self.status_banner = Some(StatusBanner {
            severity: StatusBannerSeverity::Error,
            message: format!("{}: {}", err_label(err.category()), err.message()),
        });
        self.status = match err.context() {
            UiErrorContext::BackendStartup => "Backend worker failed to start".to_string(),
            UiErrorContext::Classify => "Classification failed".to_string(),
        };
    }

    fn try_classify(&mut self) {
        match validated_submission(&self.session.description, &self.session.supplier) {
            Ok(submission) => {
                self.status_banner = None;
                let queued = dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::Classify {
                        description: submission.description.clone(),
                        supplier: submission.supplier.clone(),
                    },
                    &mut self.status,
                );
                if queued {
                    self.pending_submission = Some(PendingSubmission {
                        submission,
                        save_to_history: self.save_to_history,
                    });
                    self.output = reducer::on_classify_requested();
                    self.status = "Classifying...".to_string();
                } else {
                    self.output = reducer::on_classification_failed(self.status.clone());
                }
            }
            Err(rejection) => {
                self.status_banner = Some(StatusBanner {
                    severity: StatusBannerSeverity::Warning,
                    message: "Please enter a PO Description.".to_string(),
                });
                self.output = reducer::on_validation_rejected(rejection.to_string());
                self.status = rejection.to_string();
            }
        }
    }

    fn use_sample(&mut self) {
        self.session.apply_sample();
        self.status = "Sample values loaded".to_string();
    }

    fn clear_all(&mut self) {
        self.session.clear_inputs();
        self.output = reducer::on_cleared();
        self.status_banner = None;
        self.status = "Cleared".to_string();
    }

    fn show_hero_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("hero_panel").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                pill(ui, "PROCUREMENT");
                pill(ui, "L1 · L2 · L3");
            });
            ui.add_space(4.0);
            ui.heading(
                egui::RichText::new("PO Category Classifier")
                    .strong()
                    .size(24.0),
            );
            ui.weak("Classify purchase order descriptions into structured taxonomy in seconds.");
            ui.add_space(10.0);
        });
    }

    fn show_settings_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("run_settings_panel")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.heading("Run Settings");
                ui.add_space(6.0);
                ui.checkbox(&mut self.show_raw_output, "Show raw model output");
                ui.checkbox(&mut self.save_to_history, "Save to history");
                ui.add_space(8.0);
                ui.separator();
                ui.collapsing("Tips", |ui| {
                    ui.label("• Use specific item names and materials.");
                    ui.label("• Add unit or grade where relevant.");
                    ui.label("• Include supplier if known.");
                });
                ui.separator();
                ui.horizontal_wrapped(|ui| {
                    ui.small("Status:");
                    ui.small(egui::RichText::new(&self.status).weak());
                });
            });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.status_banner.clone() else {
            return;
        };
        let fill = match banner.severity {
            StatusBannerSeverity::Warning => egui::Color32::from_rgb(120, 53, 15),
            StatusBannerSeverity::Error => egui::Color32::from_rgb(127, 29, 29),
        };
        egui::Frame::NONE
            .fill(fill)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.status_banner = None;
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn show_main_panels(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            ui.columns(2, |columns| {
                self.show_input_column(&mut columns[0]);
                self.show_output_column(&mut columns[1]);
            });
        });
    }

    fn show_input_column(&mut self, ui: &mut egui::Ui) {
        card_frame(ui).show(ui, |ui| {
            ui.label(egui::RichText::new("Input").strong().size(16.0));
            ui.add_space(6.0);

            ui.label(egui::RichText::new("PO Description").strong());
            ui.add(
                egui::TextEdit::multiline(&mut self.session.description)
                    .id_salt("po_description_input")
                    .hint_text("e.g., 500 units of stainless steel bolts, grade 316")
                    .desired_rows(6)
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(6.0);
            ui.label(egui::RichText::new("Supplier (optional)").strong());
            ui.add(
                egui::TextEdit::singleline(&mut self.session.supplier)
                    .id_salt("supplier_input")
                    .hint_text("e.g., Fastenal")
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(10.0);
            let is_busy = matches!(self.output, OutputPanelState::Loading);
            ui.horizontal(|ui| {
                let classify_btn = egui::Button::new(egui::RichText::new("Classify").strong());
                if ui
                    .add_enabled(!is_busy && self.backend_ready, classify_btn)
                    .clicked()
                {
                    self.try_classify();
                }
                if ui
                    .add_enabled(!is_busy, egui::Button::new("Use Sample"))
                    .clicked()
                {
                    self.use_sample();
                }
                if ui.add_enabled(!is_busy, egui::Button::new("Clear")).clicked() {
                    self.clear_all();
                }
            });
        });

        ui.add_space(10.0);
        self.show_history_card(ui);
    }

    fn show_history_card(&mut self, ui: &mut egui::Ui) {
        card_frame(ui).show(ui, |ui| {
            ui.label(egui::RichText::new("Recent History").strong().size(16.0));
            ui.add_space(6.0);

            if self.session.history().is_empty() {
                ui.weak("No classifications yet.");
                return;
            }

            egui::ScrollArea::vertical()
                .id_salt("history_scroll")
                .max_height(260.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for entry in self.session.recent_history(HISTORY_DISPLAY_LIMIT) {
                        ui.label(
                            egui::RichText::new(truncate_description(&entry.description, 70))
                                .strong(),
                        );
                        ui.horizontal_wrapped(|ui| {
                            ui.small(format!("Supplier: {}", supplier_caption(&entry.supplier)));
                            ui.small(
                                egui::RichText::new(
                                    entry
                                        .submitted_at
                                        .with_timezone(&Local)
                                        .format("%H:%M:%S")
                                        .to_string(),
                                )
                                .weak(),
                            );
                        });
                        ui.separator();
                    }
                });
        });
    }

    fn show_output_column(&mut self, ui: &mut egui::Ui) {
        let output = self.output.clone();
        card_frame(ui).show(ui, |ui| {
            ui.label(egui::RichText::new("Output").strong().size(16.0));
            ui.add_space(6.0);

            match &output {
                OutputPanelState::Idle => {
                    ui.weak("Results will appear here once you run a classification.");
                }
                OutputPanelState::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Classifying...");
                    });
                }
                OutputPanelState::Displayed { pretty, .. } => {
                    egui::ScrollArea::vertical()
                        .id_salt("result_scroll")
                        .max_height(220.0)
                        .auto_shrink([false, true])
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(pretty).monospace().size(12.0));
                        });
                }
                OutputPanelState::Failed { message, raw, .. } => {
                    ui.label(egui::RichText::new(message).color(ui.visuals().error_fg_color));
                    if self.show_raw_output {
                        if let Some(raw) = raw {
                            ui.add_space(6.0);
                            egui::ScrollArea::vertical()
                                .id_salt("raw_output_scroll")
                                .max_height(160.0)
                                .auto_shrink([false, true])
                                .show(ui, |ui| {
                                    ui.label(egui::RichText::new(raw).monospace().size(12.0));
                                });
                        }
                    }
                }
            }
        });

        ui.add_space(10.0);
        self.show_metric_tiles(ui);
    }

    fn show_metric_tiles(&mut self, ui: &mut egui::Ui) {
        let levels = reducer::metric_levels(&self.output);
        ui.columns(3, |columns| {
            metric_tile(&mut columns[0], &levels.l1, "L1 Category");
            metric_tile(&mut columns[1], &levels.l2, "L2 Subcategory");
            metric_tile(&mut columns[2], &levels.l3, "L3 Detail");
        });
    }
}

impl eframe::App for ClassifierGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick = self.tick.wrapping_add(1);
        self.process_ui_events();

        self.show_hero_panel(ctx);
        self.show_settings_panel(ctx);
        self.show_main_panels(ctx);

        if matches!(self.output, OutputPanelState::Loading) {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(150));
        }
    }
}

fn card_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::NONE
        .fill(ui.visuals().faint_bg_color.gamma_multiply(0.55))
        .corner_radius(12.0)
        .stroke(egui::Stroke::new(
            1.0,
            ui.visuals().widgets.noninteractive.bg_stroke.color,
        ))
        .inner_margin(egui::Margin::symmetric(14, 12))
}

fn pill(ui: &mut egui::Ui, text: &str) {
    egui::Frame::NONE
        .fill(egui::Color32::from_rgb(17, 24, 39))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(8, 3))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(text)
                    .color(egui::Color32::from_rgb(249, 250, 251))
                    .size(10.0)
                    .strong(),
            );
        });
}

fn metric_tile(ui: &mut egui::Ui, value: &str, caption: &str) {
    card_frame(ui).show(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(value).strong().size(15.0));
            ui.small(egui::RichText::new(caption).weak());
        });
    });
}

fn truncate_description(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}…")
}

fn supplier_caption(supplier: &str) -> &str {
    if supplier.trim().is_empty() {
        "Not provided"
    } else {
        supplier
    }
}

pub fn start_backend_bridge(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
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
            let settings = classifier_client::load_settings();
            let client = match HttpClassifierClient::new(&settings) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err:#}"),
                    )));
                    tracing::error!("failed to build classifier client: {err:#}");
                    return;
                }
            };
            tracing::info!(endpoint = %client.endpoint(), "classifier client ready");
            let _ = ui_tx.try_send(UiEvent::BackendReady);

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Classify {
                        description,
                        supplier,
                    } => {
                        tracing::info!(
                            description_chars = description.len(),
                            "backend: classify"
                        );
                        match client.classify(&description, &supplier).await {
                            Ok(raw) => {
                                let _ = ui_tx.try_send(UiEvent::ClassificationReady { raw });
                            }
                            Err(err) => {
                                tracing::error!("backend: classify failed: {err:#}");
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::Classify,
                                    format!("{err:#}"),
                                )));
                            }
                        }
                    }
                }
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::UiErrorCategory;
    use crate::controller::reducer::FailureKind;
    use crossbeam_channel::bounded;

    fn test_app() -> (
        ClassifierGuiApp,
        Receiver<BackendCommand>,
        Sender<UiEvent>,
    ) {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let mut app = ClassifierGuiApp::new(cmd_tx, ui_rx);
        app.backend_ready = true;
        (app, cmd_rx, ui_tx)
    }

    #[test]
    fn classify_flow_records_history_and_displays_result() {
        let (mut app, cmd_rx, ui_tx) = test_app();
        app.session.description = "500 stainless steel bolts".to_string();
        app.session.supplier = "Fastenal".to_string();

        app.try_classify();
        assert_eq!(app.output, OutputPanelState::Loading);
        let cmd = cmd_rx.try_recv().expect("command queued");
        let BackendCommand::Classify {
            description,
            supplier,
        } = cmd;
        assert_eq!(description, "500 stainless steel bolts");
        assert_eq!(supplier, "Fastenal");

        ui_tx
            .try_send(UiEvent::ClassificationReady {
                raw: r#"{"L1":"Raw Materials","L2":"Metals","L3":"Steel"}"#.to_string(),
            })
            .expect("send event");
        app.process_ui_events();

        assert!(matches!(app.output, OutputPanelState::Displayed { .. }));
        assert_eq!(app.session.history().len(), 1);
        assert_eq!(app.session.history()[0].supplier, "Fastenal");
        assert_eq!(
            app.session.last_result.as_deref(),
            Some(r#"{"L1":"Raw Materials","L2":"Metals","L3":"Steel"}"#)
        );
    }

    #[test]
    fn save_to_history_toggle_off_keeps_history_empty() {
        let (mut app, _cmd_rx, ui_tx) = test_app();
        app.save_to_history = false;
        app.session.description = "steel plate".to_string();

        app.try_classify();
        ui_tx
            .try_send(UiEvent::ClassificationReady {
                raw: "{}".to_string(),
            })
            .expect("send event");
        app.process_ui_events();

        assert!(app.session.history().is_empty());
        assert!(app.session.last_result.is_some());
    }

    #[test]
    fn unparseable_result_is_still_recorded_before_failing_display() {
        let (mut app, _cmd_rx, ui_tx) = test_app();
        app.session.description = "steel plate".to_string();

        app.try_classify();
        ui_tx
            .try_send(UiEvent::ClassificationReady {
                raw: "not json".to_string(),
            })
            .expect("send event");
        app.process_ui_events();

        assert!(matches!(
            app.output,
            OutputPanelState::Failed {
                kind: FailureKind::Parse,
                ..
            }
        ));
        assert_eq!(app.session.history().len(), 1);
        assert_eq!(app.session.last_result.as_deref(), Some("not json"));
    }

    #[test]
    fn empty_description_warns_without_dispatching() {
        let (mut app, cmd_rx, _ui_tx) = test_app();
        app.session.description = "   \n".to_string();

        app.try_classify();

        assert!(cmd_rx.try_recv().is_err());
        assert!(matches!(
            app.output,
            OutputPanelState::Failed {
                kind: FailureKind::Validation,
                ..
            }
        ));
        let banner = app.status_banner.as_ref().expect("warning banner");
        assert_eq!(banner.severity, StatusBannerSeverity::Warning);
        assert_eq!(banner.message, "Please enter a PO Description.");
    }

    #[test]
    fn backend_classify_error_fails_current_action_and_drops_pending() {
        let (mut app, _cmd_rx, ui_tx) = test_app();
        app.session.description = "steel plate".to_string();

        app.try_classify();
        ui_tx
            .try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::Classify,
                "failed to reach classifier endpoint http://127.0.0.1:8808/classify",
            )))
            .expect("send event");
        app.process_ui_events();

        assert!(matches!(
            app.output,
            OutputPanelState::Failed {
                kind: FailureKind::Client,
                ..
            }
        ));
        assert!(app.session.history().is_empty());
        assert!(app.session.last_result.is_none());
    }

    #[test]
    fn clear_resets_inputs_result_and_output_panel() {
        let (mut app, _cmd_rx, ui_tx) = test_app();
        app.session.description = "steel plate".to_string();
        app.session.supplier = "WireCo".to_string();
        app.try_classify();
        ui_tx
            .try_send(UiEvent::ClassificationReady {
                raw: r#"{"L1":"A"}"#.to_string(),
            })
            .expect("send event");
        app.process_ui_events();

        app.clear_all();

        assert!(app.session.description.is_empty());
        assert!(app.session.supplier.is_empty());
        assert!(app.session.last_result.is_none());
        assert_eq!(app.output, OutputPanelState::Idle);
    }

    #[test]
    fn use_sample_populates_without_dispatching() {
        let (mut app, cmd_rx, _ui_tx) = test_app();

        app.use_sample();

        assert_eq!(app.session.description, classify_core::SAMPLE_DESCRIPTION);
        assert_eq!(app.session.supplier, classify_core::SAMPLE_SUPPLIER);
        assert!(cmd_rx.try_recv().is_err());
        assert_eq!(app.output, OutputPanelState::Idle);
    }

    #[test]
    fn truncates_long_descriptions_for_history_display() {
        let long = "x".repeat(90);
        let shown = truncate_description(&long, 70);
        assert_eq!(shown.chars().count(), 71);
        assert!(shown.ends_with('…'));
        assert_eq!(truncate_description("short", 70), "short");
    }

    #[test]
    fn supplier_caption_defaults_to_not_provided() {
        assert_eq!(supplier_caption(""), "Not provided");
        assert_eq!(supplier_caption("  "), "Not provided");
        assert_eq!(supplier_caption("Fastenal"), "Fastenal");
    }

    #[test]
    fn categorizes_unreachable_endpoint_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::Classify,
            "failed to reach classifier endpoint http://127.0.0.1:8808/classify: connection refused",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn categorizes_error_status_as_upstream_failure() {
        let err = UiError::from_message(
            UiErrorContext::Classify,
            "classifier endpoint http://127.0.0.1:8808/classify returned error status",
        );
        assert_eq!(err.category(), UiErrorCategory::Upstream);
    }
}

use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc;

use log::warn;

use super::panels;
use super::state::{AppState, BackgroundTask, Operation, Status, StatusResult};
use crate::convert::{ConvertRequest, convert_image};
use crate::format::{SUPPORTED_EXTENSIONS, is_supported_image, normalize_drop_payload};
use crate::preview::load_preview;

/// Main GUI application
pub struct KalconvApp {
    state: AppState,
}

impl KalconvApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            state: AppState::default(),
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().cloned());
        let Some(file) = dropped else {
            return;
        };

        // Native drops carry a path; otherwise fall back to the textual
        // payload, which some drag sources wrap in braces
        let path = match &file.path {
            Some(path) => path.clone(),
            None => PathBuf::from(normalize_drop_payload(&file.name)),
        };

        if is_supported_image(&path) {
            self.start_preview(path);
        } else {
            self.state.runtime.status = Status::Done {
                result: StatusResult::Error("Invalid image file!".to_string()),
            };
        }
    }

    fn render_drop_overlay(&self, ctx: &egui::Context) {
        let is_hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        if is_hovering {
            let screen_rect = ctx.screen_rect();
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("drop_overlay"),
            ));
            painter.rect_filled(
                screen_rect,
                0.0,
                egui::Color32::from_rgba_unmultiplied(100, 150, 255, 40),
            );
            painter.rect_stroke(
                screen_rect,
                0.0,
                egui::Stroke::new(3.0, egui::Color32::from_rgb(100, 150, 255)),
            );
        }
    }

    fn open_file_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Image Files", SUPPORTED_EXTENSIONS)
            .pick_file();

        if let Some(path) = picked {
            self.start_preview(path);
        }
    }

    /// Start decoding a preview in a background thread
    fn start_preview(&mut self, path: PathBuf) {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let _ = tx.send(load_preview(&path));
        });

        // Replacing the task drops the previous receiver, so a stale
        // completion from an older selection can never be applied
        self.state.runtime.preview_task = Some(BackgroundTask::new(rx));
        self.state.runtime.status = Status::Working {
            operation: Operation::LoadingPreview,
        };
    }

    /// Poll background preview task for completion
    fn poll_preview_task(&mut self, ctx: &egui::Context) {
        if let Some(task) = &self.state.runtime.preview_task
            && let Some(result) = task.poll()
        {
            self.state.runtime.preview_task = None;

            match result {
                Ok(frame) => {
                    let image = egui::ColorImage::from_rgba_unmultiplied(
                        [frame.width as usize, frame.height as usize],
                        &frame.pixels,
                    );
                    let texture = ctx.load_texture("preview", image, egui::TextureOptions::LINEAR);

                    // The source is committed only now, so a failed load
                    // leaves the previous selection intact
                    self.state.runtime.preview = Some(texture);
                    self.state.session.source = Some(frame.path);
                    self.state.runtime.status = Status::Done {
                        result: StatusResult::Success("Image loaded successfully!".to_string()),
                    };
                }
                Err(err) => {
                    warn!("Preview load failed: {err}");
                    self.state.runtime.status = Status::Done {
                        result: StatusResult::Error(format!("Error loading image: {err}")),
                    };
                }
            }
        }
    }

    /// Start a conversion in a background thread
    fn start_convert(&mut self) {
        // Single-slot queue: ignore clicks while a conversion is in flight
        if self.state.runtime.convert_task.is_some() {
            return;
        }

        let request = match ConvertRequest::validate(
            self.state.session.source.as_deref(),
            Some(self.state.session.format),
        ) {
            Ok(request) => request,
            Err(err) => {
                self.state.runtime.status = Status::Done {
                    result: StatusResult::Error(err.to_string()),
                };
                return;
            }
        };

        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let _ = tx.send(convert_image(&request));
        });

        self.state.runtime.convert_task = Some(BackgroundTask::new(rx));
        self.state.runtime.status = Status::Working {
            operation: Operation::Converting,
        };
    }

    /// Poll background convert task for completion
    fn poll_convert_task(&mut self) {
        if let Some(task) = &self.state.runtime.convert_task
            && let Some(result) = task.poll()
        {
            self.state.runtime.convert_task = None;

            match result {
                Ok(output) => {
                    self.state.runtime.status = Status::Done {
                        result: StatusResult::Success(format!(
                            "Image converted and saved as: {}",
                            output.display()
                        )),
                    };
                }
                Err(err) => {
                    warn!("Conversion failed: {err}");
                    self.state.runtime.status = Status::Done {
                        result: StatusResult::Error(format!("Error during conversion: {err}")),
                    };
                }
            }
        }
    }
}

impl eframe::App for KalconvApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle dropped files
        self.handle_dropped_files(ctx);

        // Poll background tasks
        self.poll_preview_task(ctx);
        self.poll_convert_task();

        // Keep repainting while work is pending so completions apply promptly
        if self.state.runtime.preview_task.is_some() || self.state.runtime.convert_task.is_some() {
            ctx.request_repaint();
        }

        // Bottom bar with buttons, format selector, and status
        let action = egui::TopBottomPanel::bottom("control_bar")
            .show(ctx, |ui| panels::control_bar(ui, &mut self.state))
            .inner;

        if action.select_requested {
            self.open_file_dialog();
        }
        if action.convert_requested {
            self.start_convert();
        }

        // Central canvas with the preview
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::canvas_panel(ui, &self.state);
        });

        // Render drag-drop overlay on top of everything
        self.render_drop_overlay(ctx);
    }
}

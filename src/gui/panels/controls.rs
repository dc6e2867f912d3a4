use eframe::egui;

use crate::format::TargetFormat;
use crate::gui::state::{AppState, Operation, Status, StatusResult};

/// Action requested by the control bar
#[derive(Default)]
pub struct ControlAction {
    pub select_requested: bool,
    pub convert_requested: bool,
}

/// Bottom bar with Select/Convert buttons, format selector, and status line
pub fn control_bar(ui: &mut egui::Ui, state: &mut AppState) -> ControlAction {
    let mut action = ControlAction::default();

    ui.horizontal(|ui| {
        let is_converting = state.runtime.convert_task.is_some();
        let is_busy = matches!(state.runtime.status, Status::Working { .. });

        if ui.button("Select Image").clicked() {
            action.select_requested = true;
        }

        ui.label("Convert to:");
        egui::ComboBox::from_id_salt("target_format")
            .selected_text(state.session.format.to_string())
            .show_ui(ui, |ui| {
                for format in TargetFormat::ALL {
                    ui.selectable_value(&mut state.session.format, format, format.to_string());
                }
            });

        // Stays clickable with nothing selected so validation can report it
        if ui
            .add_enabled(!is_converting, egui::Button::new("Convert Image"))
            .clicked()
        {
            action.convert_requested = true;
        }

        if is_busy {
            ui.spinner();
        }

        ui.separator();

        // Status text, colored by outcome
        match &state.runtime.status {
            Status::Idle => {}
            Status::Working { operation } => {
                ui.label(match operation {
                    Operation::LoadingPreview => "Loading image...",
                    Operation::Converting => "Converting...",
                });
            }
            Status::Done { result } => match result {
                StatusResult::Success(msg) => {
                    ui.colored_label(egui::Color32::from_rgb(40, 167, 69), msg);
                }
                StatusResult::Error(msg) => {
                    ui.colored_label(egui::Color32::from_rgb(255, 100, 100), msg);
                }
            },
        }
    });

    action
}

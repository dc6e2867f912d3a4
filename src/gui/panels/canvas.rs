use eframe::egui;

use crate::gui::state::AppState;

/// Fixed size of the preview surface
const SURFACE_WIDTH: f32 = 400.0;
const SURFACE_HEIGHT: f32 = 300.0;

/// Fixed-size surface showing the current thumbnail, or a drop hint
pub fn canvas_panel(ui: &mut egui::Ui, state: &AppState) {
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);

        let (response, painter) = ui.allocate_painter(
            egui::vec2(SURFACE_WIDTH, SURFACE_HEIGHT),
            egui::Sense::hover(),
        );
        let rect = response.rect;

        painter.rect_filled(rect, 2.0, egui::Color32::WHITE);
        painter.rect_stroke(
            rect,
            2.0,
            egui::Stroke::new(1.0, egui::Color32::from_gray(180)),
        );

        if let Some(texture) = &state.runtime.preview {
            // Center the thumbnail on the surface, snapped to whole pixels
            let size = texture.size_vec2();
            let offset = egui::vec2(
                ((SURFACE_WIDTH - size.x) / 2.0).floor(),
                ((SURFACE_HEIGHT - size.y) / 2.0).floor(),
            );
            let image_rect = egui::Rect::from_min_size(rect.min + offset, size);

            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        } else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Drag and drop image here\nor click 'Select Image'",
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(102),
            );
        }
    });
}

mod canvas;
mod controls;

pub use canvas::canvas_panel;
pub use controls::{ControlAction, control_bar};

use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc;

use crate::error::KalconvError;
use crate::format::TargetFormat;
use crate::preview::PreviewFrame;

// ─────────────────────────────────────────────────────────────────────────────
// Background Task Abstraction
// ─────────────────────────────────────────────────────────────────────────────

/// Generic handle for background operations (preview loading, converting).
/// Dropping the task drops the receiver, which makes any late completion
/// unreachable.
pub struct BackgroundTask<T> {
    receiver: mpsc::Receiver<Result<T, KalconvError>>,
}

impl<T> BackgroundTask<T> {
    pub fn new(receiver: mpsc::Receiver<Result<T, KalconvError>>) -> Self {
        Self { receiver }
    }

    /// Non-blocking poll for result
    pub fn poll(&self) -> Option<Result<T, KalconvError>> {
        self.receiver.try_recv().ok()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// State: Split into Session (user selections) and Runtime (transient)
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level application state. Only the UI thread mutates it; workers
/// report back through the task channels.
#[derive(Default)]
pub struct AppState {
    pub session: SessionState,
    pub runtime: RuntimeState,
}

/// The user's selections for this run
#[derive(Default)]
pub struct SessionState {
    /// Committed only once a preview decode succeeds
    pub source: Option<PathBuf>,
    pub format: TargetFormat,
}

/// Transient runtime state (texture, status, in-flight tasks)
#[derive(Default)]
pub struct RuntimeState {
    pub status: Status,
    pub preview: Option<egui::TextureHandle>,
    pub preview_task: Option<BackgroundTask<PreviewFrame>>,
    pub convert_task: Option<BackgroundTask<PathBuf>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Status line
// ─────────────────────────────────────────────────────────────────────────────

/// One status line is visible at a time; each new event overwrites it
#[derive(Default)]
pub enum Status {
    #[default]
    Idle,
    Working {
        operation: Operation,
    },
    Done {
        result: StatusResult,
    },
}

#[derive(Clone, Copy)]
pub enum Operation {
    LoadingPreview,
    Converting,
}

pub enum StatusResult {
    Success(String),
    Error(String),
}

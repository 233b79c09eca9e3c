//! Background resource loading without blocking the presentation thread.
//!
//! Loading the AI backend can take tens of seconds (local models) or fail
//! outright. [`AsyncLoader`] runs the caller's factory on a worker thread
//! and delivers the outcome back through the UI queue: exactly one of
//! `on_ready` / `on_failure` fires, exactly once, on the presentation
//! thread. Any retry/fallback strategy (e.g. trying a smaller model) lives
//! inside the factory and is opaque here.

use std::thread;

use crate::ui::UiHandle;

/// Runs slow factories off the presentation thread.
pub struct AsyncLoader {
    ui: UiHandle,
}

impl AsyncLoader {
    pub fn new(ui: UiHandle) -> Self {
        Self { ui }
    }

    /// Load a resource in the background.
    ///
    /// `on_progress` fires once on the presentation thread when loading
    /// begins, then the factory runs on a worker thread. Its result is
    /// marshaled back: `Ok` -> `on_ready(resource)`, `Err` -> `on_failure
    /// (message)`. Returns immediately.
    pub fn load<R, F>(
        &self,
        progress_label: impl Into<String>,
        factory: F,
        on_progress: impl FnOnce(String) + Send + 'static,
        on_ready: impl FnOnce(R) + Send + 'static,
        on_failure: impl FnOnce(String) + Send + 'static,
    ) where
        R: Send + 'static,
        F: FnOnce() -> Result<R, String> + Send + 'static,
    {
        let label = progress_label.into();
        let ui = self.ui.clone();

        ui.post(move || on_progress(label));

        thread::spawn(move || {
            // The move of on_ready/on_failure into exactly one posted task
            // is what guarantees single delivery.
            match factory() {
                Ok(resource) => {
                    tracing::debug!("loader factory succeeded");
                    ui.post(move || on_ready(resource));
                }
                Err(message) => {
                    tracing::warn!(error = %message, "loader factory failed");
                    ui.post(move || on_failure(message));
                }
            }
        });
    }
}

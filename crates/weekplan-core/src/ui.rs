//! Hand-off queue between worker threads and the presentation thread.
//!
//! All widget and shared-state mutation happens on one presentation thread.
//! Workers never touch that state directly: they post closures onto a
//! [`UiQueue`] through a cloneable [`UiHandle`], and the presentation loop
//! drains the queue on its own thread, the same way a GUI toolkit's
//! `post`/`after(0, callback)` hand-off works.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

/// A unit of work to run on the presentation thread.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Producer side; cheap to clone into worker threads.
#[derive(Clone)]
pub struct UiHandle {
    tx: Sender<UiTask>,
}

impl UiHandle {
    /// Queue a closure for the presentation thread.
    ///
    /// If the queue consumer is gone (presentation loop shut down) the task
    /// is dropped; workers finishing after shutdown have nothing left to
    /// report to.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) {
        if self.tx.send(Box::new(task)).is_err() {
            tracing::debug!("ui queue closed, dropping task");
        }
    }
}

/// Consumer side; owned by the presentation thread.
pub struct UiQueue {
    rx: Receiver<UiTask>,
}

impl UiQueue {
    pub fn new() -> (Self, UiHandle) {
        let (tx, rx) = channel();
        (Self { rx }, UiHandle { tx })
    }

    /// Run every task currently queued, without blocking.
    ///
    /// Returns the number of tasks executed.
    pub fn drain(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Drain, blocking up to `timeout` for the first task to arrive.
    ///
    /// Used where the presentation loop (or a test) wants to wait for a
    /// worker completion without spinning.
    pub fn drain_for(&self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut ran = 0;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(task) => {
                    task();
                    ran += 1;
                    // Collect anything else already queued.
                    ran += self.drain();
                    if ran > 0 {
                        return ran;
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return ran;
                }
            }
        }
    }
}

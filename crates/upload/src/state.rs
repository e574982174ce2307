//! Shared upload state for polling front-ends.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Lifecycle of one upload as seen by a polling front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadStatus {
    Idle,
    Uploading,
    Completed,
    Failed,
}

/// Thread-safe progress/status container.
///
/// A background worker publishes progress here while a front-end polls it
/// on a timer from another thread; all access goes through the inner lock.
pub struct UploadState {
    inner: RwLock<StateInner>,
}

struct StateInner {
    status: UploadStatus,
    progress: f64,
    error: String,
}

impl Default for UploadState {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadState {
    /// Creates an idle state.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StateInner {
                status: UploadStatus::Idle,
                progress: 0.0,
                error: String::new(),
            }),
        }
    }

    /// Marks the upload as started and resets progress.
    pub fn start(&self) {
        let mut s = self.inner.write().unwrap();
        s.status = UploadStatus::Uploading;
        s.progress = 0.0;
        s.error.clear();
    }

    /// Publishes a progress fraction, clamped to [0, 1].
    pub fn set_progress(&self, fraction: f64) {
        let mut s = self.inner.write().unwrap();
        s.progress = fraction.clamp(0.0, 1.0);
    }

    /// Marks the upload as completed.
    pub fn complete(&self) {
        let mut s = self.inner.write().unwrap();
        s.status = UploadStatus::Completed;
        s.progress = 1.0;
    }

    /// Marks the upload as failed with an error message.
    pub fn fail(&self, err: &str) {
        let mut s = self.inner.write().unwrap();
        s.status = UploadStatus::Failed;
        s.error = err.to_string();
    }

    /// Current progress fraction in [0, 1].
    pub fn progress(&self) -> f64 {
        self.inner.read().unwrap().progress
    }

    /// Current status.
    pub fn status(&self) -> UploadStatus {
        self.inner.read().unwrap().status.clone()
    }

    /// Last error message (empty unless failed).
    pub fn error(&self) -> String {
        self.inner.read().unwrap().error.clone()
    }

    /// Returns `true` while a transfer is running.
    pub fn is_active(&self) -> bool {
        self.inner.read().unwrap().status == UploadStatus::Uploading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn new_state_is_idle() {
        let state = UploadState::new();
        assert_eq!(state.status(), UploadStatus::Idle);
        assert_eq!(state.progress(), 0.0);
        assert!(!state.is_active());
    }

    #[test]
    fn start_resets_progress_and_error() {
        let state = UploadState::new();
        state.fail("boom");
        state.start();
        assert_eq!(state.status(), UploadStatus::Uploading);
        assert_eq!(state.progress(), 0.0);
        assert_eq!(state.error(), "");
        assert!(state.is_active());
    }

    #[test]
    fn progress_is_clamped() {
        let state = UploadState::new();
        state.set_progress(1.5);
        assert_eq!(state.progress(), 1.0);
        state.set_progress(-0.5);
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn complete_pins_progress_to_one() {
        let state = UploadState::new();
        state.start();
        state.set_progress(0.4);
        state.complete();
        assert_eq!(state.status(), UploadStatus::Completed);
        assert_eq!(state.progress(), 1.0);
        assert!(!state.is_active());
    }

    #[test]
    fn fail_records_error() {
        let state = UploadState::new();
        state.start();
        state.fail("connection error");
        assert_eq!(state.status(), UploadStatus::Failed);
        assert_eq!(state.error(), "connection error");
    }

    #[test]
    fn concurrent_writer_and_readers() {
        use std::thread;

        let state = Arc::new(UploadState::new());
        state.start();

        let mut handles = vec![];

        for i in 0..4 {
            let s = Arc::clone(&state);
            handles.push(thread::spawn(move || {
                for j in 0..250 {
                    s.set_progress(f64::from(i * 250 + j) / 1000.0);
                }
            }));
        }

        for _ in 0..4 {
            let s = Arc::clone(&state);
            handles.push(thread::spawn(move || {
                for _ in 0..250 {
                    let p = s.progress();
                    assert!((0.0..=1.0).contains(&p));
                    let _ = s.is_active();
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }
    }
}

//! Transient Notices
//!
//! Toast-style status messages for uploads, exports and the generation stub.
//! Time is supplied by the caller in seconds so the board behaves the same on
//! native and in the browser.

use super::error::{ErrorKind, StudioError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Session time (seconds) after which the notice is dropped.
    pub expires_at: f64,
}

/// Holds the notices currently on screen, oldest first.
#[derive(Debug)]
pub struct NoticeBoard {
    lifetime: f64,
    now: f64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    /// Most notices kept at once; older ones are pushed out.
    const MAX_VISIBLE: usize = 5;

    pub fn new(lifetime_secs: f32) -> Self {
        Self {
            lifetime: lifetime_secs as f64,
            now: 0.0,
            notices: Vec::new(),
        }
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Error => tracing::warn!(%message, "notice"),
            _ => tracing::info!(%message, "notice"),
        }
        self.notices.push(Notice {
            level,
            message,
            expires_at: self.now + self.lifetime,
        });
        if self.notices.len() > Self::MAX_VISIBLE {
            let excess = self.notices.len() - Self::MAX_VISIBLE;
            self.notices.drain(..excess);
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    /// Surface an error. Validation problems are shown as-is; resource
    /// failures get a short prefix so the user knows nothing changed.
    pub fn error(&mut self, err: &StudioError) {
        let message = match err.kind() {
            ErrorKind::Validation | ErrorKind::FeatureLimit => err.to_string(),
            ErrorKind::Resource => format!("Something went wrong: {err}"),
        };
        self.push(NoticeLevel::Error, message);
    }

    /// Move the clock and drop expired notices.
    pub fn advance(&mut self, now: f64) {
        self.now = now;
        self.notices.retain(|n| n.expires_at > now);
    }

    pub fn visible(&self) -> &[Notice] {
        &self.notices
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

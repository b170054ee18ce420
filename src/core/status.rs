//! # Status Module
//!
//! A side channel for informational messages produced while the pipeline runs
//! (voxel counts, dimensions, skipped palette entries). Messages are collected so
//! a front end can display them, and mirrored to the `log` facade as they arrive.

use log::{info, warn};

/// Severity of a collected status message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StatusLevel {
    /// Progress and statistics.
    Info,
    /// Something was skipped or substituted but the pipeline carried on.
    Warning,
}

/// A single message collected by a [`StatusHandler`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    /// How important the message is.
    pub level: StatusLevel,
    /// The human readable text.
    pub text: String,
}

/// Collects status messages for the current pipeline run.
///
/// Nothing in the pipeline reads messages back; adding one never changes the result of
/// the stage that produced it.
#[derive(Debug, Default)]
pub struct StatusHandler {
    messages: Vec<StatusMessage>,
}

impl StatusHandler {
    /// Creates an empty status handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an informational message.
    ///
    /// # Arguments
    /// * `text` - The message to record
    pub fn info(&mut self, text: impl Into<String>) {
        let text = text.into();
        info!("{}", text);
        self.messages.push(StatusMessage {
            level: StatusLevel::Info,
            text,
        });
    }

    /// Records a warning.
    ///
    /// # Arguments
    /// * `text` - The message to record
    pub fn warning(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!("{}", text);
        self.messages.push(StatusMessage {
            level: StatusLevel::Warning,
            text,
        });
    }

    /// Returns every message collected so far, oldest first.
    pub fn messages(&self) -> &[StatusMessage] {
        &self.messages
    }

    /// Removes and returns every collected message.
    pub fn drain(&mut self) -> Vec<StatusMessage> {
        std::mem::take(&mut self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_kept_in_order() {
        let mut status = StatusHandler::new();
        status.info("first");
        status.warning("second");

        let messages = status.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].level, StatusLevel::Info);
        assert_eq!(messages[0].text, "first");
        assert_eq!(messages[1].level, StatusLevel::Warning);
    }

    #[test]
    fn drain_empties_the_handler() {
        let mut status = StatusHandler::new();
        status.info("only");
        assert_eq!(status.drain().len(), 1);
        assert!(status.messages().is_empty());
    }
}

//! Notification boundary. The engine reports outcomes as values; presenting
//! them is the caller's business.

use crate::error::EngineError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

impl From<&EngineError> for Notification {
    fn from(err: &EngineError) -> Self {
        match err {
            EngineError::HistoryEmpty => Notification::info("Nothing to revert."),
            EngineError::NoProject => Notification::warning("Open or compute a project first."),
            EngineError::Pairing(_) => Notification::error("Please select words from different texts."),
            EngineError::Synonym(_) => Notification::error("No synonym found for the selected region."),
            EngineError::Selection(e) => {
                Notification::error(format!("The selection could not be used: {e}"))
            }
            EngineError::Computation(e) => {
                Notification::error(format!("An error occurred during analysis: {e}"))
            }
            EngineError::Decode(e) => {
                Notification::error(format!("The file is not a valid project: {e}"))
            }
            EngineError::Encode(e) => {
                Notification::error(format!("An error occurred while exporting the result: {e}"))
            }
            EngineError::Persistence(e) => Notification::error(e.to_string()),
        }
    }
}

impl From<EngineError> for Notification {
    fn from(err: EngineError) -> Self {
        Notification::from(&err)
    }
}

/// Collapses a command result into the one signal the user sees.
pub fn notify(result: Result<Notification, EngineError>) -> Notification {
    result.unwrap_or_else(Notification::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TextSide;
    use crate::error::PairingError;

    #[test]
    fn empty_history_is_informational() {
        let notification = notify(Err(EngineError::HistoryEmpty));
        assert_eq!(notification.level, NotificationLevel::Info);
        assert!(!notification.is_error());
    }

    #[test]
    fn pairing_error_asks_for_other_text() {
        let err = EngineError::Pairing(PairingError::SameText { side: TextSide::A });
        assert_eq!(
            Notification::from(err),
            Notification::error("Please select words from different texts.")
        );
    }

    #[test]
    fn success_passes_through() {
        let ok = Notification::success("done");
        assert_eq!(notify(Ok(ok.clone())), ok);
        assert_eq!(ok.to_string(), "[success] done");
    }
}

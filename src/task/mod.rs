//! Asynchronous generation tasks: submission, polling, and defensive
//! extraction across provider response variants.

pub mod extract;
pub mod poll;
pub mod submit;

pub use poll::TaskPoller;
pub use submit::TaskSubmitter;

/// Per-poll classification of a remote task.
///
/// `Unreachable` is transient (a bad poll, not a bad task) and never
/// terminal; `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Completed,
    Failed,
    Unreachable,
}

impl TaskStatus {
    /// Map a provider status string onto the task state machine.
    ///
    /// Unknown strings are treated as still pending rather than failing the
    /// poll; providers grow new in-flight states over time.
    pub fn from_provider(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "completed" | "success" | "finished" => Self::Completed,
            "failed" | "error" => Self::Failed,
            _ => Self::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_status_mapping_is_case_insensitive() {
        assert_eq!(TaskStatus::from_provider("COMPLETED"), TaskStatus::Completed);
        assert_eq!(TaskStatus::from_provider("Success"), TaskStatus::Completed);
        assert_eq!(TaskStatus::from_provider("finished"), TaskStatus::Completed);
        assert_eq!(TaskStatus::from_provider("FAILED"), TaskStatus::Failed);
        assert_eq!(TaskStatus::from_provider("error"), TaskStatus::Failed);
    }

    #[test]
    fn unknown_status_stays_pending() {
        assert_eq!(TaskStatus::from_provider("staged"), TaskStatus::Pending);
        assert_eq!(TaskStatus::from_provider("processing"), TaskStatus::Pending);
        assert_eq!(TaskStatus::from_provider(""), TaskStatus::Pending);
    }

    #[test]
    fn terminal_states() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Unreachable.is_terminal());
    }
}

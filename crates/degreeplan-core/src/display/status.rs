//! Confirmation lines for board commands.

use std::fmt;

use crate::queue::Operation;

/// Result line of a command, with the durable write it scheduled if any.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
    pub scheduled: Option<Operation>,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
            scheduled: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            scheduled: None,
        }
    }

    /// Records the queued write so it is shown after the message.
    pub fn with_operation(mut self, op: Option<Operation>) -> Self {
        self.scheduled = op;
        self
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{label} {}", self.message)?;
        match &self.scheduled {
            Some(op) => writeln!(f, "Saved: `{op}`"),
            None if self.success => writeln!(f, "No store change needed."),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Season, SemesterId};

    #[test]
    fn test_operation_status_display() {
        let op = Operation::AddSemester {
            user_id: 1,
            semester: SemesterId::new(Season::Fall, 2024),
        };
        let success = OperationStatus::success("Added Fall 2024").with_operation(Some(op));
        let output = success.to_string();
        assert!(output.starts_with("Success: Added Fall 2024"));
        assert!(output.contains("Saved: `ADD_SEMESTER FALL2024`"));

        let local = OperationStatus::success("Reordered Fall 2024");
        assert!(local.to_string().contains("No store change needed."));

        let failure = OperationStatus::failure("Unknown course");
        assert_eq!(failure.to_string(), "Error: Unknown course\n");
    }
}

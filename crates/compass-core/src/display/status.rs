//! Short confirmation messages for operations without a resource to show.

use std::fmt;

/// A one-line success or failure notice.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.success { "✓" } else { "✗" };
        writeln!(f, "{marker} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_display() {
        let success = OperationStatus::success("Task 4 now depends on task 2");
        assert_eq!(success.to_string(), "✓ Task 4 now depends on task 2\n");

        let failure = OperationStatus::failure("Nothing to update");
        assert_eq!(failure.to_string(), "✗ Nothing to update\n");
    }
}

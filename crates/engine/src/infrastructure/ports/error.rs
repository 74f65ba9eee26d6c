//! Errors surfaced by persistence ports.

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// The backing store failed the call. Carries the port operation name.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// The request conflicts with what is stored, e.g. saving an item that was
    /// never assigned a uid or splitting more than a stack holds.
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl RepoError {
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn constraint(message: impl ToString) -> Self {
        Self::Constraint(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_database_fails_message_names_operation() {
        let err = RepoError::database("save_cubes", "connection reset");
        assert_eq!(err.to_string(), "Database error in save_cubes: connection reset");
    }
}

//! Errors raised by domain containers and value parsing.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value is outside its allowed range
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation conflicts with current container state
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Slot {slot} out of range for size {size}")]
    InvalidSlot { slot: i16, size: i16 },

    #[error("Container full: {current}/{max} items")]
    ContainerFull { current: u32, max: u32 },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// For `FromStr`/`TryFrom` impls that receive an unknown variant.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn invalid_slot(slot: i16, size: i16) -> Self {
        Self::InvalidSlot { slot, size }
    }

    pub fn container_full(current: u32, max: u32) -> Self {
        Self::ContainerFull { current, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_slot_invalid_message_names_slot_and_size() {
        let err = DomainError::invalid_slot(25, 20);
        assert_eq!(err.to_string(), "Slot 25 out of range for size 20");
    }

    #[test]
    fn when_container_full_message_names_counts() {
        let err = DomainError::container_full(5, 5);
        assert_eq!(err.to_string(), "Container full: 5/5 items");
    }
}

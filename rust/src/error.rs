//! Error handling and result types for BPlusMultiMap operations.
//!
//! The only operational failure is rejecting an invalid order at
//! construction time; once a tree exists, every operation is total and
//! "not found" is a normal `None` result. The remaining variants report
//! integrity violations found by the validation methods.

/// Error type for multimap operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// Invalid order specified at construction.
    InvalidOrder(String),
    /// Internal data structure integrity violation.
    DataIntegrityError(String),
    /// Tree corruption detected.
    CorruptedTree(String),
}

impl TreeError {
    /// Create an InvalidOrder error with context.
    pub fn invalid_order(order: usize, min_required: usize) -> Self {
        Self::InvalidOrder(format!(
            "Order {} is invalid (minimum required: {})",
            order, min_required
        ))
    }

    /// Create a DataIntegrityError with context.
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrityError(format!("{}: {}", context, details))
    }

    /// Create a CorruptedTree error with context.
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Check if this error is an order error.
    pub fn is_order_error(&self) -> bool {
        matches!(self, Self::InvalidOrder(_))
    }
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::InvalidOrder(msg) => write!(f, "Invalid order: {}", msg),
            TreeError::DataIntegrityError(msg) => write!(f, "Data integrity error: {}", msg),
            TreeError::CorruptedTree(msg) => write!(f, "Corrupted tree: {}", msg),
        }
    }
}

impl std::error::Error for TreeError {}

/// Result type for multimap operations that may fail.
pub type TreeResult<T> = Result<T, TreeError>;

/// Result type for tree construction.
pub type InitResult<T> = Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TreeError::invalid_order(2, 3);
        assert!(err.is_order_error());
        assert_eq!(
            err.to_string(),
            "Invalid order: Order 2 is invalid (minimum required: 3)"
        );

        let err = TreeError::corrupted_tree("Leaf chain", "broken prev link");
        assert_eq!(
            err.to_string(),
            "Corrupted tree: Leaf chain corruption: broken prev link"
        );
    }
}

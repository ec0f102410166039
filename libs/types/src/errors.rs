//! Error types for value parsing and arithmetic

use thiserror::Error;

/// Errors raised while parsing or combining amounts and identities
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Invalid amount: {input}")]
    InvalidAmount { input: String },

    #[error("Amount has more than 18 fractional digits: {input}")]
    TooPrecise { input: String },

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Invalid address: {input}")]
    InvalidAddress { input: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_amount_display() {
        let err = UnitsError::InvalidAmount {
            input: "-1".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid amount: -1");
    }

    #[test]
    fn test_invalid_address_display() {
        let err = UnitsError::InvalidAddress {
            input: "0xzz".to_string(),
        };
        assert!(err.to_string().contains("0xzz"));
    }
}

//! Domain validation errors for journal types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! These errors are returned by `try_new` constructors that validate inputs.
//!
//! # Examples
//!
//! ```
//! use strikebook::domain::error::DomainError;
//! use strikebook::domain::trade::NetPremium;
//! use rust_decimal_macros::dec;
//!
//! let result = NetPremium::from_columns(Some(dec!(1.50)), Some(dec!(0.75)));
//! assert!(matches!(result, Err(DomainError::CreditAndDebit { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A trade is either a net credit or a net debit position, never both.
    #[error("trade cannot carry both net credit {credit} and net debit {debit}")]
    CreditAndDebit {
        /// The credit amount that was provided.
        credit: rust_decimal::Decimal,
        /// The debit amount that was provided.
        debit: rust_decimal::Decimal,
    },

    /// Option legs must have a positive contract quantity.
    #[error("leg quantity must be positive, got {quantity}")]
    NonPositiveQuantity {
        /// The invalid quantity that was provided.
        quantity: i64,
    },

    /// Ticker symbols cannot be blank.
    #[error("symbol cannot be empty")]
    EmptySymbol,

    /// A textual enum value did not match any known variant.
    #[error("unknown {kind} '{value}'")]
    UnknownVariant {
        /// Which enum was being parsed.
        kind: &'static str,
        /// The value that failed to parse.
        value: String,
    },
}

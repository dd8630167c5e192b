//! Style construction errors.

use thiserror::Error;

/// Errors surfaced while constructing computed style values.
///
/// These are construction-time errors: by the time layout runs, every value
/// in a [`crate::ComputedStyle`] is well-formed, so layout never sees them.
#[derive(Debug, Error, PartialEq)]
pub enum StyleError {
    /// A length could not be resolved to a pixel value.
    ///
    /// Raised by [`crate::Length::try_resolve`] when the explicit policy
    /// meets an `auto` value the caller promised to have handled.
    #[error("unresolvable length: {0}")]
    BadLength(String),

    /// A keyword value outside the supported set.
    #[error("invalid value for '{property}': {value}")]
    InvalidValue {
        /// The property being assigned.
        property: &'static str,
        /// The offending keyword.
        value: String,
    },
}

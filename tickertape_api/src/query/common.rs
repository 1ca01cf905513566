//! Shared query infrastructure: the [`Query`] trait and [`ParseQueryError`].

use url::Url;

/// Trait implemented by all query builders. Provides URL serialization.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}

/// Returned when a query parameter string is not one of the values the
/// endpoint accepts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} '{value}' (expected one of: {expected})")]
pub struct ParseQueryError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

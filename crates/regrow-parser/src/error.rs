use thiserror::Error;

/// Errors detected while assembling a [`Language`](crate::Language)
/// descriptor from its raw tables.
///
/// These are host configuration mistakes, caught once at construction time;
/// parsing itself never fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LanguageError {
    #[error("a language must define at least the {expected} builtin symbols, got {found}")]
    MissingBuiltins { expected: usize, found: usize },

    #[error("hidden-symbol flags cover {found} symbols, expected {expected}")]
    HiddenFlagCount { expected: usize, found: usize },

    #[error(
        "parse table has {found} cells, expected {state_count} states x {symbol_count} symbols = {expected}"
    )]
    TableSize {
        expected: usize,
        found: usize,
        state_count: usize,
        symbol_count: usize,
    },

    #[error("a language must define at least one parse state")]
    NoStates,
}

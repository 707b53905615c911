use thiserror::Error;

pub type UfResult<T> = Result<T, UfError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UfError {
    /// Malformed numeral, whitespace, or a misplaced annotation.
    #[error("Format error: {what}")]
    Format { what: String },

    #[error("Unresolved symbol '{symbol}' in expression '{expression}'")]
    UnresolvedSymbol { symbol: String, expression: String },

    #[error("Dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: String, right: String },

    /// Canonicalization stalled on an axis that has no rule and no dimension.
    #[error("Cannot convert {metric} to base units")]
    NonConvertible { metric: String },

    #[error("Not implemented: {what}")]
    NotImplemented { what: String },

    /// Rejected while building a unit system.
    #[error("Invalid definition: {what}")]
    Definition { what: String },
}

impl UfError {
    pub fn format(what: impl Into<String>) -> Self {
        UfError::Format { what: what.into() }
    }

    pub fn definition(what: impl Into<String>) -> Self {
        UfError::Definition { what: what.into() }
    }
}

use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum AmountIssue {
    #[error("must be >= 0")]
    Negative,
    #[error("must be finite")]
    NonFinite,
    #[error("is not a number")]
    NotANumber,
    #[error("sum of all categories is not finite")]
    TotalOverflow,
    #[error("annual total (12 x monthly) is not finite")]
    AnnualOverflow,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ProjectionError {
    #[error("{category} amount {issue}")]
    InvalidAmount {
        category: String,
        issue: AmountIssue,
    },
    #[error("{field} {reason}")]
    InvalidAssumption {
        field: &'static str,
        reason: &'static str,
    },
}

impl ProjectionError {
    pub(crate) fn amount(category: &str, issue: AmountIssue) -> Self {
        ProjectionError::InvalidAmount {
            category: category.to_string(),
            issue,
        }
    }

    pub(crate) fn assumption(field: &'static str, reason: &'static str) -> Self {
        ProjectionError::InvalidAssumption { field, reason }
    }

    /// Stable machine-readable tag for inline validation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ProjectionError::InvalidAmount { .. } => "invalid-amount",
            ProjectionError::InvalidAssumption { .. } => "invalid-assumption",
        }
    }
}

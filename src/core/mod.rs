mod engine;
mod error;
mod presets;
mod types;

pub use engine::{
    category_breakdown, compute_monthly_total, compute_projection, future_value, parse_amount,
    validate_amount,
};
pub use error::{AmountIssue, ProjectionError};
pub use presets::Preset;
pub use types::{
    CategoryShare, DEFAULT_INFLATION_RATE, DEFAULT_WITHDRAWAL_MULTIPLIER,
    DEFAULT_YEARS_TO_HORIZON, ExpenseCategories, ExpenseCategory, InflationHorizon,
    ProjectionAssumptions, ProjectionResult,
};

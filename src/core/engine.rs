use super::error::{AmountIssue, ProjectionError};
use super::types::{CategoryShare, ExpenseCategories, ProjectionAssumptions, ProjectionResult};

const MONTHS_PER_YEAR: f64 = 12.0;
const TOTAL_LABEL: &str = "total";

pub fn validate_amount(category: &str, amount: f64) -> Result<f64, ProjectionError> {
    if amount.is_nan() {
        return Err(ProjectionError::amount(category, AmountIssue::NotANumber));
    }
    if amount.is_infinite() {
        return Err(ProjectionError::amount(category, AmountIssue::NonFinite));
    }
    if amount < 0.0 {
        return Err(ProjectionError::amount(category, AmountIssue::Negative));
    }
    Ok(amount)
}

/// Coerces a raw form value such as `" $1,250.50 "` into a validated amount.
/// Commas are only accepted as thousands separators.
pub fn parse_amount(category: &str, raw: &str) -> Result<f64, ProjectionError> {
    let not_a_number = || ProjectionError::amount(category, AmountIssue::NotANumber);

    let trimmed = raw.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let unsigned = rest.strip_prefix('$').unwrap_or(rest).trim_start();
    if negative && unsigned.starts_with(['-', '+']) {
        return Err(not_a_number());
    }
    let digits = strip_group_separators(unsigned).ok_or_else(not_a_number)?;
    if digits.is_empty() {
        return Err(not_a_number());
    }
    let value = digits.parse::<f64>().map_err(|_| not_a_number())?;
    validate_amount(category, if negative { -value } else { value })
}

/// `"12,345.67"` -> `"12345.67"`; `None` when a comma is not a 3-digit group separator.
fn strip_group_separators(text: &str) -> Option<String> {
    if !text.contains(',') {
        return Some(text.to_string());
    }
    let (int_part, rest) = match text.find(['.', 'e', 'E']) {
        Some(idx) => text.split_at(idx),
        None => (text, ""),
    };
    if rest.contains(',') {
        return None;
    }

    let mut groups = int_part.split(',');
    let first = groups.next()?;
    let first_ok = (1..=3).contains(&first.len()) && first.bytes().all(|b| b.is_ascii_digit());
    if !first_ok {
        return None;
    }
    let mut out = first.to_string();
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        out.push_str(group);
    }
    out.push_str(rest);
    Some(out)
}

pub fn compute_monthly_total(categories: &ExpenseCategories) -> Result<f64, ProjectionError> {
    let mut total = 0.0;
    for category in categories.iter() {
        total += validate_amount(&category.name, category.monthly_amount)?;
    }
    if !total.is_finite() {
        return Err(ProjectionError::amount(
            TOTAL_LABEL,
            AmountIssue::TotalOverflow,
        ));
    }
    Ok(total)
}

/// `FV = PV * (1 + r)^n`. The exponent may be fractional.
pub fn future_value(
    present_value: f64,
    inflation_rate: f64,
    years_to_horizon: f64,
) -> Result<f64, ProjectionError> {
    validate_amount("present_value", present_value)?;
    if !inflation_rate.is_finite() || inflation_rate < 0.0 {
        return Err(ProjectionError::assumption(
            "inflation_rate",
            "must be a finite number >= 0",
        ));
    }
    if !years_to_horizon.is_finite() || years_to_horizon < 0.0 {
        return Err(ProjectionError::assumption(
            "years_to_horizon",
            "must be a finite number >= 0",
        ));
    }

    let value = present_value * (1.0 + inflation_rate).powf(years_to_horizon);
    if !value.is_finite() {
        return Err(ProjectionError::assumption(
            "years_to_horizon",
            "produces a future value too large to represent",
        ));
    }
    Ok(value)
}

pub fn compute_projection(
    categories: &ExpenseCategories,
    assumptions: &ProjectionAssumptions,
) -> Result<ProjectionResult, ProjectionError> {
    let multiplier = assumptions.withdrawal_multiplier;
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(ProjectionError::assumption(
            "withdrawal_multiplier",
            "must be a finite number > 0",
        ));
    }

    let monthly_total = compute_monthly_total(categories)?;
    let annual_total = monthly_total * MONTHS_PER_YEAR;
    if !annual_total.is_finite() {
        return Err(ProjectionError::amount(
            TOTAL_LABEL,
            AmountIssue::AnnualOverflow,
        ));
    }
    let nest_egg_today = annual_total * multiplier;
    if !nest_egg_today.is_finite() {
        return Err(ProjectionError::assumption(
            "withdrawal_multiplier",
            "produces a nest egg too large to represent",
        ));
    }

    let nest_egg_future = match assumptions.inflation {
        Some(horizon) => Some(future_value(
            nest_egg_today,
            horizon.inflation_rate,
            horizon.years_to_horizon,
        )?),
        None => None,
    };

    Ok(ProjectionResult {
        monthly_total,
        annual_total,
        nest_egg_today,
        nest_egg_future,
    })
}

/// Each category as a fraction of the monthly total, in category order.
/// A zero total yields zero shares rather than NaN.
pub fn category_breakdown(
    categories: &ExpenseCategories,
) -> Result<Vec<CategoryShare>, ProjectionError> {
    let total = compute_monthly_total(categories)?;
    Ok(categories
        .iter()
        .map(|category| CategoryShare {
            name: category.name.clone(),
            monthly_amount: category.monthly_amount,
            share: if total > 0.0 {
                category.monthly_amount / total
            } else {
                0.0
            },
        })
        .collect())
}

use serde::Serialize;

use super::error::ProjectionError;

pub const DEFAULT_WITHDRAWAL_MULTIPLIER: f64 = 25.0;
pub const DEFAULT_INFLATION_RATE: f64 = 0.03;
pub const DEFAULT_YEARS_TO_HORIZON: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    pub name: String,
    pub monthly_amount: f64,
}

/// Monthly amounts keyed by category name, in insertion order.
///
/// Amounts are stored as given; validation happens when a calculation
/// consumes them so the error can name the offending category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseCategories {
    entries: Vec<ExpenseCategory>,
}

impl ExpenseCategories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a category, or replaces the amount of an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, monthly_amount: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.monthly_amount = monthly_amount,
            None => self.entries.push(ExpenseCategory {
                name,
                monthly_amount,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.monthly_amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExpenseCategory> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ExpenseCategories {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut categories = ExpenseCategories::new();
        for (name, amount) in iter {
            categories.insert(name, amount);
        }
        categories
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationHorizon {
    pub inflation_rate: f64,
    pub years_to_horizon: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProjectionAssumptions {
    pub withdrawal_multiplier: f64,
    /// `None` skips the future-value projection.
    pub inflation: Option<InflationHorizon>,
}

impl Default for ProjectionAssumptions {
    fn default() -> Self {
        Self {
            withdrawal_multiplier: DEFAULT_WITHDRAWAL_MULTIPLIER,
            inflation: None,
        }
    }
}

impl ProjectionAssumptions {
    /// Multiplier from a safe withdrawal rate, e.g. 0.04 -> 25.
    pub fn from_withdrawal_rate(rate: f64) -> Result<Self, ProjectionError> {
        if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
            return Err(ProjectionError::assumption(
                "withdrawal_rate",
                "must be > 0 and <= 1",
            ));
        }
        Ok(Self {
            withdrawal_multiplier: 1.0 / rate,
            inflation: None,
        })
    }

    pub fn with_inflation(mut self, inflation_rate: f64, years_to_horizon: f64) -> Self {
        self.inflation = Some(InflationHorizon {
            inflation_rate,
            years_to_horizon,
        });
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub monthly_total: f64,
    pub annual_total: f64,
    pub nest_egg_today: f64,
    pub nest_egg_future: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub name: String,
    pub monthly_amount: f64,
    pub share: f64,
}

use serde::Serialize;

use super::types::{DEFAULT_INFLATION_RATE, DEFAULT_YEARS_TO_HORIZON, ExpenseCategories};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Family,
    Household,
}

const FAMILY_CATEGORIES: &[(&str, f64)] = &[
    ("Housing", 2000.0),
    ("Transport", 800.0),
    ("Food", 1000.0),
    ("Utilities", 400.0),
    ("Healthcare", 500.0),
    ("Family", 600.0),
    ("Lifestyle", 300.0),
    ("Other", 200.0),
];

const HOUSEHOLD_CATEGORIES: &[(&str, f64)] = &[
    ("Housing", 0.0),
    ("Transport", 0.0),
    ("Food", 0.0),
    ("Utilities", 0.0),
    ("Healthcare", 0.0),
    ("Family/Lifestyle", 0.0),
    ("Shopping", 0.0),
    ("Debt", 0.0),
    ("Vacation", 0.0),
    ("Other", 0.0),
];

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Family, Preset::Household];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Family => "family",
            Preset::Household => "household",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Preset::Family => "Family Expense & Nest Egg Calculator",
            Preset::Household => "Household Expense Tracker",
        }
    }

    pub fn default_amounts(self) -> &'static [(&'static str, f64)] {
        match self {
            Preset::Family => FAMILY_CATEGORIES,
            Preset::Household => HOUSEHOLD_CATEGORIES,
        }
    }

    pub fn categories(self) -> ExpenseCategories {
        self.default_amounts().iter().copied().collect()
    }

    /// `(inflation_rate, years_to_horizon)` when the preset projects inflation by default.
    pub fn default_inflation(self) -> Option<(f64, f64)> {
        match self {
            Preset::Family => Some((DEFAULT_INFLATION_RATE, DEFAULT_YEARS_TO_HORIZON)),
            Preset::Household => None,
        }
    }

    pub fn display_decimals(self) -> usize {
        match self {
            Preset::Family => 2,
            Preset::Household => 0,
        }
    }
}

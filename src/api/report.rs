use std::fmt::Write as _;

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

use super::ProjectionResponse;

const BAR_WIDTH: f64 = 30.0;

/// `$` amount with thousands separators and a fixed number of decimals.
pub fn format_currency(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };
    let sign = if value < 0.0 { "-" } else { "" };
    let grouped = group_thousands(int_part);
    match frac_part {
        Some(frac) => format!("{sign}${grouped}.{frac}"),
        None => format!("{sign}${grouped}"),
    }
}

pub fn format_percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub(super) fn render_text_report(response: &ProjectionResponse) -> String {
    let mut out = String::new();
    let figures = &response.formatted;

    let _ = writeln!(out, "{}", response.preset.title());
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<24}{}", "Total Monthly Expenses", figures.monthly_total);
    let _ = writeln!(out, "{:<24}{}", "Total Annual Expenses", figures.annual_total);
    let _ = writeln!(
        out,
        "{:<24}{}  ({}x annual spending, today's dollars)",
        "Nest Egg Goal",
        figures.nest_egg_today,
        trim_multiplier(response.withdrawal_multiplier)
    );
    if let (Some(future), Some(horizon)) = (&figures.nest_egg_future, response.inflation) {
        let _ = writeln!(
            out,
            "{:<24}{}  (in {} years at {} inflation)",
            "Adjusted for Inflation",
            future,
            trim_multiplier(horizon.years_to_horizon),
            format_percent(horizon.inflation_rate)
        );
    }

    if !response.breakdown.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Expense Breakdown");
        let _ = writeln!(out, "{}", breakdown_table(response));
    }

    out
}

fn breakdown_table(response: &ProjectionResponse) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Category", "Monthly", "Share", ""]);
    for share in &response.breakdown {
        builder.push_record([
            share.name.clone(),
            format_currency(share.monthly_amount, response.decimals),
            format_percent(share.share),
            "#".repeat((share.share * BAR_WIDTH).round() as usize),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::blank())
        .with(Modify::new(Columns::new(1..3)).with(Alignment::right()));
    table.to_string()
}

fn trim_multiplier(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

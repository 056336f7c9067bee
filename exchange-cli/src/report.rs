//! Plain-text rendering of calculator figures.

use chrono::NaiveDate;
use exchange_core::calculations::calculators::{
    BootResult, DebtReliefOutcome, DebtReliefResult, DepreciationRecaptureResult,
    ExchangeCostResult, IdentificationReport, IdentificationRule, ReplacementValueResult,
};
use exchange_core::calculations::timeline::ExchangeTimeline;
use exchange_core::models::MilestoneStatus;
use rust_decimal::Decimal;

use crate::utils::{format_currency, format_percent};

const LABEL_WIDTH: usize = 34;
const VALUE_WIDTH: usize = 18;

/// Accumulates aligned `label  value` lines.
#[derive(Debug, Default)]
struct TextReport {
    lines: Vec<String>,
}

impl TextReport {
    fn titled(title: &str) -> Self {
        Self {
            lines: vec![title.to_string(), "-".repeat(LABEL_WIDTH + VALUE_WIDTH)],
        }
    }

    fn row(
        &mut self,
        label: &str,
        value: impl AsRef<str>,
    ) -> &mut Self {
        self.lines.push(format!(
            "{label:<LABEL_WIDTH$}{:>VALUE_WIDTH$}",
            value.as_ref()
        ));
        self
    }

    fn money(
        &mut self,
        label: &str,
        amount: Decimal,
    ) -> &mut Self {
        self.row(label, format_currency(amount))
    }

    fn note(
        &mut self,
        text: impl Into<String>,
    ) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    fn finish(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

pub fn render_boot(result: &BootResult) -> String {
    let mut report = TextReport::titled("Boot");
    report
        .money("Cash boot", result.cash_boot)
        .money("Mortgage boot", result.mortgage_boot)
        .money("Total boot", result.total_boot)
        .money("Estimated tax on boot", result.estimated_tax);
    if result.fully_deferred {
        report.blank().note("No boot: the full gain is deferred.");
    }
    report.finish()
}

pub fn render_debt_relief(result: &DebtReliefResult) -> String {
    let mut report = TextReport::titled("Debt relief");
    report
        .money("Debt change", result.debt_change)
        .money("Mortgage boot", result.mortgage_boot)
        .money("Estimated tax", result.estimated_tax)
        .blank();
    match result.outcome {
        DebtReliefOutcome::BootRecognized => {
            report.note("Debt was reduced; the reduction is taxable boot.")
        }
        DebtReliefOutcome::NoBoot => {
            report.note("Replacement debt is equal or higher; no mortgage boot.")
        }
    };
    report.finish()
}

pub fn render_recapture(result: &DepreciationRecaptureResult) -> String {
    TextReport::titled("Depreciation recapture")
        .money("Adjusted basis", result.adjusted_basis)
        .money("Total gain", result.total_gain)
        .money("Recapture base", result.recapture_base)
        .money("Recapture tax", result.recapture_tax)
        .money("Capital gain portion", result.capital_gain_portion)
        .money("Net after recapture", result.net_after_recapture)
        .finish()
}

pub fn render_replacement_value(result: &ReplacementValueResult) -> String {
    let mut report = TextReport::titled("Replacement property value");
    report
        .money("Net proceeds", result.net_proceeds)
        .money("Equity to reinvest", result.equity_to_reinvest)
        .money("Minimum replacement value", result.minimum_replacement_value)
        .money(
            "Recommended replacement value",
            result.recommended_replacement_value,
        );
    if result.debt_replacement_shortfall > Decimal::ZERO {
        report.blank().note(format!(
            "New mortgage is {} below the old one; add cash or debt to avoid mortgage boot.",
            format_currency(result.debt_replacement_shortfall)
        ));
    }
    report.finish()
}

pub fn render_costs(result: &ExchangeCostResult) -> String {
    let mut report = TextReport::titled("Exchange costs");
    for item in &result.items {
        report.money(&item.label, item.amount);
    }
    report.money("Total costs", result.total_costs).row(
        "Percent of property value",
        result
            .costs_as_percent_of_value
            .map_or_else(|| "n/a".to_string(), format_percent),
    );
    report.finish()
}

pub fn render_identification(report: &IdentificationReport) -> String {
    let mut text = TextReport::titled("Identification rules");
    text.row("Properties identified", report.property_count.to_string())
        .money("Total identified value", report.total_identified_value)
        .money("Total to acquire", report.total_acquired_value)
        .blank();
    for check in &report.checks {
        let verdict = if check.passed { "PASS" } else { "FAIL" };
        let detail = match check.rule {
            IdentificationRule::ThreeProperty => {
                format!("{} of {} allowed", check.actual, check.limit)
            }
            IdentificationRule::TwoHundredPercent => format!(
                "{} vs limit {}",
                format_currency(check.actual),
                format_currency(check.limit)
            ),
            IdentificationRule::NinetyFivePercent => format!(
                "{} vs required {}",
                format_currency(check.actual),
                format_currency(check.limit)
            ),
        };
        text.note(format!("{verdict}  {}: {detail}", check.rule));
    }
    text.blank().note(if report.compliant {
        "Identification is valid under at least one rule."
    } else {
        "Identification fails every rule."
    });
    text.finish()
}

pub fn render_timeline(
    timeline: &ExchangeTimeline,
    today: NaiveDate,
) -> String {
    let mut report = TextReport::titled("Exchange timeline");
    report
        .row("Closing date", timeline.closing_date.to_string())
        .row(
            "Identification deadline",
            timeline.identification_deadline.to_string(),
        )
        .row(
            "Exchange deadline",
            timeline.replacement_deadline.to_string(),
        )
        .row("Phase", timeline.phase(today).as_str())
        .row(
            "Days to identification deadline",
            timeline.days_until_identification(today).to_string(),
        )
        .row(
            "Days to exchange deadline",
            timeline.days_until_replacement(today).to_string(),
        )
        .blank();
    for (milestone, status) in timeline.milestone_statuses(today) {
        let marker = match status {
            MilestoneStatus::Completed => "[x]",
            MilestoneStatus::Today => "[>]",
            MilestoneStatus::Upcoming => "[ ]",
        };
        report.note(format!(
            "{marker} {}  {}: {}",
            milestone.date, milestone.label, milestone.notes
        ));
    }
    report.finish()
}

pub fn render_errors(messages: &[String]) -> String {
    let mut out = String::from("Please correct the following:\n");
    for message in messages {
        out.push_str("  - ");
        out.push_str(message);
        out.push('\n');
    }
    out
}

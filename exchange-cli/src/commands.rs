//! Subcommands of the estimator and their execution.
//!
//! Amount arguments are taken as raw text and handed to the calculators
//! unchanged, so a missing or malformed value produces the same messages a
//! form would show.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand, ValueEnum};
use exchange_core::calculations::calculators::{
    BootForm, DebtReliefForm, DepreciationRecaptureForm, ExchangeCostForm, IdentificationForm,
    ReplacementValueForm,
};
use exchange_core::calculations::timeline::TimelineForm;
use exchange_core::{CalculationResult, Calculator, ExchangeRules};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::properties_loader::{self, PropertiesLoadError};
use crate::report;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cash and mortgage boot with the estimated tax on it.
    Boot(BootArgs),
    /// Mortgage boot from a decrease in debt.
    DebtRelief(DebtReliefArgs),
    /// Depreciation recapture on the relinquished property.
    Recapture(RecaptureArgs),
    /// Minimum and recommended replacement property value.
    ReplacementValue(ReplacementValueArgs),
    /// Itemized exchange closing costs.
    Costs(CostsArgs),
    /// Check identified properties against the 3-property, 200% and 95% rules.
    Identify(IdentifyArgs),
    /// 45-day and 180-day deadlines with milestones.
    Timeline(TimelineArgs),
}

#[derive(Debug, Args)]
pub struct BootArgs {
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub sale_price: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub relinquished_debt: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub replacement_price: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub replacement_debt: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub cash_received: String,
    /// Percent, e.g. `20` for 20%.
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub tax_rate: String,
}

#[derive(Debug, Args)]
pub struct DebtReliefArgs {
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub old_mortgage: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub new_mortgage: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub tax_rate: String,
}

#[derive(Debug, Args)]
pub struct RecaptureArgs {
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub cost_basis: String,
    /// Accumulated depreciation taken.
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub depreciation: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub sale_price: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub recapture_rate: String,
}

#[derive(Debug, Args)]
pub struct ReplacementValueArgs {
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub sale_price: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub mortgage: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub exchange_costs: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub cash_to_receive: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub new_mortgage: String,
}

#[derive(Debug, Args)]
pub struct CostsArgs {
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub qi_fee: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub escrow_fee: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub title_insurance: String,
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub recording_fees: String,
    /// When given, costs are also shown as a percentage of it.
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub property_value: String,
}

#[derive(Debug, Args)]
pub struct IdentifyArgs {
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    pub relinquished_value: String,
    /// CSV with `address`, `value` and optional `acquire` columns.
    #[arg(long)]
    pub properties: PathBuf,
}

#[derive(Debug, Args)]
pub struct TimelineArgs {
    /// Relinquished property closing date, `YYYY-MM-DD`.
    #[arg(long, default_value = "")]
    pub closing_date: String,
    /// Evaluate status as of this date instead of the local date.
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

/// Failures that stop a command before it can report figures.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Properties(#[from] PropertiesLoadError),

    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rendered command output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// False when the calculator rejected its input.
    pub valid: bool,
    pub rendered: String,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boot(_) => "boot",
            Self::DebtRelief(_) => "debt-relief",
            Self::Recapture(_) => "recapture",
            Self::ReplacementValue(_) => "replacement-value",
            Self::Costs(_) => "costs",
            Self::Identify(_) => "identify",
            Self::Timeline(_) => "timeline",
        }
    }
}

/// Runs one command against `rules` and renders the outcome.
pub fn execute(
    command: &Command,
    rules: &ExchangeRules,
    format: OutputFormat,
) -> Result<CommandOutput, CommandError> {
    info!(command = command.name(), "running calculation");
    match command {
        Command::Boot(args) => {
            let form = BootForm {
                sale_price: args.sale_price.clone(),
                relinquished_debt: args.relinquished_debt.clone(),
                replacement_price: args.replacement_price.clone(),
                replacement_debt: args.replacement_debt.clone(),
                cash_received: args.cash_received.clone(),
                tax_rate: args.tax_rate.clone(),
            };
            render(&form.calculate(rules), format, report::render_boot)
        }
        Command::DebtRelief(args) => {
            let form = DebtReliefForm {
                old_mortgage: args.old_mortgage.clone(),
                new_mortgage: args.new_mortgage.clone(),
                tax_rate: args.tax_rate.clone(),
            };
            render(&form.calculate(rules), format, report::render_debt_relief)
        }
        Command::Recapture(args) => {
            let form = DepreciationRecaptureForm {
                cost_basis: args.cost_basis.clone(),
                accumulated_depreciation: args.depreciation.clone(),
                sale_price: args.sale_price.clone(),
                recapture_rate: args.recapture_rate.clone(),
            };
            render(&form.calculate(rules), format, report::render_recapture)
        }
        Command::ReplacementValue(args) => {
            let form = ReplacementValueForm {
                sale_price: args.sale_price.clone(),
                mortgage: args.mortgage.clone(),
                exchange_costs: args.exchange_costs.clone(),
                cash_to_receive: args.cash_to_receive.clone(),
                new_mortgage: args.new_mortgage.clone(),
            };
            render(
                &form.calculate(rules),
                format,
                report::render_replacement_value,
            )
        }
        Command::Costs(args) => {
            let form = ExchangeCostForm {
                qi_fee: args.qi_fee.clone(),
                escrow_fee: args.escrow_fee.clone(),
                title_insurance: args.title_insurance.clone(),
                recording_fees: args.recording_fees.clone(),
                property_value: args.property_value.clone(),
            };
            render(&form.calculate(rules), format, report::render_costs)
        }
        Command::Identify(args) => {
            let form = IdentificationForm {
                relinquished_value: args.relinquished_value.clone(),
                properties: properties_loader::load_from_file(&args.properties)?,
            };
            render(
                &form.calculate(rules),
                format,
                report::render_identification,
            )
        }
        Command::Timeline(args) => {
            let today = args.today.unwrap_or_else(|| Local::now().date_naive());
            debug!(today = %today, "timeline status date");
            let form = TimelineForm {
                closing_date: args.closing_date.clone(),
            };
            render(&form.calculate(rules), format, |timeline| {
                report::render_timeline(timeline, today)
            })
        }
    }
}

fn render<T, F>(
    result: &CalculationResult<T>,
    format: OutputFormat,
    render_text: F,
) -> Result<CommandOutput, CommandError>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let rendered = match (format, result.figures()) {
        (OutputFormat::Json, _) => {
            let mut json = serde_json::to_string_pretty(result)?;
            json.push('\n');
            json
        }
        (OutputFormat::Text, Some(figures)) => render_text(figures),
        (OutputFormat::Text, None) => report::render_errors(&result.error_messages()),
    };
    Ok(CommandOutput {
        valid: result.is_valid(),
        rendered,
    })
}

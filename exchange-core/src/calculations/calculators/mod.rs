pub mod boot;
pub mod debt_relief;
pub mod depreciation_recapture;
pub mod exchange_costs;
pub mod identification;
pub mod replacement_value;

pub use boot::{BootForm, BootInput, BootResult, derive_boot};
pub use debt_relief::{
    DebtReliefForm, DebtReliefInput, DebtReliefOutcome, DebtReliefResult, derive_debt_relief,
};
pub use depreciation_recapture::{
    DepreciationRecaptureForm, DepreciationRecaptureInput, DepreciationRecaptureResult,
    derive_depreciation_recapture,
};
pub use exchange_costs::{
    CostLine, ExchangeCostForm, ExchangeCostInput, ExchangeCostResult, MIN_PROPERTY_VALUE,
    derive_exchange_costs,
};
pub use identification::{
    IdentificationForm, IdentificationInput, IdentificationReport, IdentificationRule,
    IdentificationRulesChecker, IdentifiedProperty, IdentifiedPropertyForm, RuleCheck,
};
pub use replacement_value::{
    ReplacementValueCalculator, ReplacementValueForm, ReplacementValueInput,
    ReplacementValueResult,
};

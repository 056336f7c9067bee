//! Calculator abstraction and the explicit re-derivation cycle.
//!
//! A form holds raw text. [`Calculator::calculate`] validates it and runs the
//! derivation. [`CalculatorSession`] owns one form together with its latest
//! result: once a result exists, every edit recomputes and replaces it.

use thiserror::Error;
use tracing::debug;

use crate::calculations::validation::sanitize_numeric_input;
use crate::models::{CalculationResult, ExchangeRules};

/// A form that can be validated and turned into computed figures.
pub trait Calculator {
    /// The numeric outputs produced on success.
    type Figures;

    /// Validates the form and, when every constraint passes, derives the figures.
    ///
    /// Never panics: any input combination yields either figures or errors.
    fn calculate(
        &self,
        rules: &ExchangeRules,
    ) -> CalculationResult<Self::Figures>;
}

/// Returned when a field name does not belong to the form.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown field '{field}'; expected one of: {}", .expected.join(", "))]
pub struct UnknownFieldError {
    pub field: String,
    pub expected: &'static [&'static str],
}

/// A form whose inputs are a flat set of named text fields.
pub trait FormFields: Default {
    /// Field names in display order.
    const FIELDS: &'static [&'static str];

    fn field_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut String>;

    /// Filters a keystroke for the named field. Numeric by default.
    fn sanitize(
        _field: &str,
        raw: &str,
    ) -> String {
        sanitize_numeric_input(raw)
    }

    /// Sets one field to `raw`, unmodified.
    fn set_field(
        &mut self,
        name: &str,
        raw: &str,
    ) -> Result<(), UnknownFieldError> {
        let slot = self.field_mut(name).ok_or_else(|| UnknownFieldError {
            field: name.to_string(),
            expected: Self::FIELDS,
        })?;
        *slot = raw.to_string();
        Ok(())
    }

    /// Builds a form from `(name, raw value)` pairs. Missing fields stay empty.
    fn from_fields<'a, I>(fields: I) -> Result<Self, UnknownFieldError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut form = Self::default();
        for (name, raw) in fields {
            form.set_field(name, raw)?;
        }
        Ok(form)
    }
}

/// One calculator's client-side state: its form and the latest result.
pub struct CalculatorSession<C: Calculator> {
    form: C,
    rules: ExchangeRules,
    result: Option<CalculationResult<C::Figures>>,
}

impl<C: Calculator> CalculatorSession<C> {
    pub fn new(
        form: C,
        rules: ExchangeRules,
    ) -> Self {
        Self {
            form,
            rules,
            result: None,
        }
    }

    pub fn form(&self) -> &C {
        &self.form
    }

    /// The latest result, or `None` before the first submission.
    pub fn result(&self) -> Option<&CalculationResult<C::Figures>> {
        self.result.as_ref()
    }

    /// Computes from the current form and replaces any previous result.
    pub fn submit(&mut self) -> &CalculationResult<C::Figures> {
        self.result.insert(self.form.calculate(&self.rules))
    }

    /// Applies an edit to the form.
    ///
    /// If a result already exists it is recomputed from the edited form and
    /// returned; otherwise only the form changes.
    pub fn edit<F>(
        &mut self,
        apply: F,
    ) -> Option<&CalculationResult<C::Figures>>
    where
        F: FnOnce(&mut C),
    {
        apply(&mut self.form);
        if self.result.is_none() {
            return None;
        }
        debug!("recomputing after edit");
        Some(self.submit())
    }

    /// Clears the form and drops the result.
    pub fn reset(&mut self)
    where
        C: Default,
    {
        self.form = C::default();
        self.result = None;
    }
}

impl<C: Calculator + FormFields> CalculatorSession<C> {
    /// Handles a keystroke: sanitizes `raw`, stores it, and recomputes when
    /// a result already exists.
    pub fn input(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Result<Option<&CalculationResult<C::Figures>>, UnknownFieldError> {
        let cleaned = C::sanitize(field, raw);
        self.form.set_field(field, &cleaned)?;
        if self.result.is_none() {
            return Ok(None);
        }
        Ok(Some(self.submit()))
    }
}

use serde::{Serialize, Serializer};

use crate::calculations::validation::ValidationError;

/// Outcome of one calculator run.
///
/// Either every figure is present and `errors` is empty, or there are no
/// figures and `errors` lists every violated constraint in order. There is
/// no partially valid state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationResult<T> {
    is_valid: bool,
    #[serde(serialize_with = "serialize_messages")]
    errors: Vec<ValidationError>,
    figures: Option<T>,
}

impl<T> CalculationResult<T> {
    pub fn valid(figures: T) -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            figures: Some(figures),
        }
    }

    /// Builds a rejected result. `errors` must be non-empty.
    pub(crate) fn invalid(errors: Vec<ValidationError>) -> Self {
        debug_assert!(!errors.is_empty(), "an invalid result needs at least one error");
        Self {
            is_valid: false,
            errors,
            figures: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// The user-facing message for each error, in order.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn figures(&self) -> Option<&T> {
        self.figures.as_ref()
    }

    pub fn into_result(self) -> Result<T, Vec<ValidationError>> {
        match self.figures {
            Some(figures) => Ok(figures),
            None => Err(self.errors),
        }
    }
}

impl<T> From<Result<T, Vec<ValidationError>>> for CalculationResult<T> {
    fn from(result: Result<T, Vec<ValidationError>>) -> Self {
        match result {
            Ok(figures) => Self::valid(figures),
            Err(errors) => Self::invalid(errors),
        }
    }
}

fn serialize_messages<S>(
    errors: &[ValidationError],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(errors.iter().map(ToString::to_string))
}

//! Filter translation.
//!
//! A filter expression has the form `column=operator.value`, e.g. `id=eq.5` or
//! `name=ilike.*test*`. It becomes one PostgREST query parameter. The operator
//! vocabulary is not checked here; PostgREST rejects what it does not understand.

use crate::error::{RestError, RestResult};
use crate::rest::request::QueryParams;

/// A parsed `column=operator.value` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub condition: String,
}

impl Filter {
    /// Split on the first `=`. The condition may itself contain `=`.
    pub fn parse(expression: &str) -> RestResult<Self> {
        let Some((column, condition)) = expression.split_once('=') else {
            return Err(RestError::validation(format!(
                "Invalid filter '{}': expected column=operator.value (e.g. 'id=eq.5')",
                expression
            )));
        };

        if column.trim().is_empty() {
            return Err(RestError::validation(format!(
                "Invalid filter '{}': column name is empty",
                expression
            )));
        }

        Ok(Self {
            column: column.to_string(),
            condition: condition.to_string(),
        })
    }

    /// Set this filter on `params`, replacing any parameter with the same column.
    pub fn apply_to(&self, params: &mut QueryParams) {
        params.set(&self.column, &self.condition);
    }

    /// Build a parameter list holding only this filter.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.apply_to(&mut params);
        params
    }
}

/// Apply an optional filter expression to `params`. No-op when absent.
pub fn apply(params: &mut QueryParams, expression: Option<&str>) -> RestResult<()> {
    if let Some(expression) = expression {
        Filter::parse(expression)?.apply_to(params);
    }
    Ok(())
}

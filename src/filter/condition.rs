//! Comparison conditions used by the numeric and date filters

use crate::error::{ImporterError, Result};
use crate::text::dates::DateBound;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    #[serde(alias = ">")]
    Gt,
    #[serde(alias = ">=")]
    Ge,
    #[serde(alias = "=", alias = "==")]
    Eq,
    #[serde(alias = "<=")]
    Le,
    #[serde(alias = "<")]
    Lt,
}

impl Operator {
    /// Compare `value` against `bound` (`value <op> bound`).
    pub fn evaluate<T: PartialOrd>(self, value: &T, bound: &T) -> bool {
        match self {
            Operator::Gt => value > bound,
            Operator::Ge => value >= bound,
            Operator::Eq => value == bound,
            Operator::Le => value <= bound,
            Operator::Lt => value < bound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericCondition {
    pub operator: Operator,
    pub number: f64,
}

impl NumericCondition {
    pub fn new(operator: Operator, number: f64) -> Self {
        Self { operator, number }
    }

    pub fn matches(&self, value: f64) -> bool {
        self.operator.evaluate(&value, &self.number)
    }
}

/// A date condition as configured: `date` is `YYYY-MM-DD`,
/// `YYYY-MM-DDThh:mm:ss`, or `NOW`/`TODAY` with an optional offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateConditionConfig {
    pub operator: Operator,
    pub date: String,
}

impl DateConditionConfig {
    pub fn new(operator: Operator, date: impl Into<String>) -> Self {
        Self {
            operator,
            date: date.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCondition {
    operator: Operator,
    bound: DateBound,
}

impl DateCondition {
    pub fn new(handler: &'static str, config: &DateConditionConfig) -> Result<Self> {
        let bound = DateBound::parse(&config.date)
            .ok_or_else(|| ImporterError::config(handler, format!("unsupported condition date `{}`", config.date)))?;
        Ok(Self {
            operator: config.operator,
            bound,
        })
    }

    /// Evaluate against `value`; relative bounds are resolved at `now`.
    pub fn matches_at(&self, value: NaiveDateTime, now: NaiveDateTime) -> bool {
        self.bound
            .resolve_at(now)
            .is_some_and(|bound| self.operator.evaluate(&value, &bound))
    }
}

//! Model specification: response, predictors and intercept.

use crate::solvers::RegressionError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which variables enter a linear model.
///
/// Predictors keep their order; each becomes one design column (numeric) or
/// one column per non-reference level (categorical).
///
/// ```rust,ignore
/// let spec: ModelSpec = "score ~ hours + section".parse()?;
/// let spec = ModelSpec::new("score").predictor("hours").predictor("section");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    response: String,
    predictors: Vec<String>,
    with_intercept: bool,
    references: BTreeMap<String, String>,
}

impl ModelSpec {
    /// Intercept-only model for `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            predictors: Vec::new(),
            with_intercept: true,
            references: BTreeMap::new(),
        }
    }

    /// Add a predictor.
    pub fn predictor(mut self, name: impl Into<String>) -> Self {
        self.predictors.push(name.into());
        self
    }

    /// Include or drop the intercept column.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.with_intercept = include;
        self
    }

    /// Use `level` as the reference (dropped) level of categorical `variable`.
    pub fn reference(mut self, variable: impl Into<String>, level: impl Into<String>) -> Self {
        self.references.insert(variable.into(), level.into());
        self
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn predictors(&self) -> &[String] {
        &self.predictors
    }

    pub fn has_intercept(&self) -> bool {
        self.with_intercept
    }

    /// Reference level requested for `variable`, if any.
    pub fn reference_for(&self, variable: &str) -> Option<&str> {
        self.references.get(variable).map(String::as_str)
    }

    /// Check the specification for internal consistency.
    pub fn validate(&self) -> Result<(), RegressionError> {
        if self.response.is_empty() {
            return Err(RegressionError::InvalidSpecification(
                "response name is empty".into(),
            ));
        }
        if !self.with_intercept && self.predictors.is_empty() {
            return Err(RegressionError::InvalidSpecification(
                "model has no terms".into(),
            ));
        }
        for (i, name) in self.predictors.iter().enumerate() {
            if name == &self.response {
                return Err(RegressionError::InvalidSpecification(format!(
                    "response '{name}' cannot also be a predictor"
                )));
            }
            if self.predictors[..i].contains(name) {
                return Err(RegressionError::InvalidSpecification(format!(
                    "predictor '{name}' listed twice"
                )));
            }
        }
        for variable in self.references.keys() {
            if !self.predictors.contains(variable) {
                return Err(RegressionError::InvalidSpecification(format!(
                    "reference level given for '{variable}', which is not a predictor"
                )));
            }
        }
        Ok(())
    }
}

impl FromStr for ModelSpec {
    type Err = RegressionError;

    /// Parse `response ~ a + b`. `- 1` or `+ 0` removes the intercept, `+ 1` keeps it.
    fn from_str(formula: &str) -> Result<Self, Self::Err> {
        let invalid = |msg: &str| RegressionError::InvalidSpecification(format!("{msg}: '{formula}'"));

        let (lhs, rhs) = formula
            .split_once('~')
            .ok_or_else(|| invalid("formula needs '~'"))?;
        let response = lhs.trim();
        if response.is_empty() {
            return Err(invalid("formula has no response"));
        }

        let mut spec = ModelSpec::new(response);
        let mut sign = '+';
        let mut token = String::new();
        let mut saw_term = false;
        let mut at_start = true;

        // The trailing '+' flushes the last term.
        for ch in rhs.chars().chain(std::iter::once('+')) {
            if ch == '+' || ch == '-' {
                let term = token.trim();
                if term.is_empty() {
                    if !at_start {
                        return Err(invalid("dangling operator"));
                    }
                } else {
                    match (sign, term) {
                        ('-', "1") | ('+', "0") => spec.with_intercept = false,
                        ('+', "1") => spec.with_intercept = true,
                        ('-', _) => return Err(invalid("only '- 1' may be subtracted")),
                        (_, name) => spec.predictors.push(name.to_string()),
                    }
                    saw_term = true;
                }
                at_start = false;
                sign = ch;
                token.clear();
            } else {
                token.push(ch);
            }
        }

        if !saw_term {
            return Err(invalid("formula has no terms"));
        }
        spec.validate()?;
        Ok(spec)
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ ", self.response)?;
        if self.predictors.is_empty() {
            return write!(f, "{}", if self.with_intercept { "1" } else { "0" });
        }
        write!(f, "{}", self.predictors.join(" + "))?;
        if !self.with_intercept {
            write!(f, " - 1")?;
        }
        Ok(())
    }
}

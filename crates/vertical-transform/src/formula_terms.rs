//! Parsing of `formula_terms` attributes.
//!
//! A vertical coordinate names the variables its formula needs with text like
//! `"s: s_rho eta: zeta depth: h a: theta_s b: theta_b depth_c: hc"`.

use grid_common::{GridError, GridResult};
use std::fmt;

/// Ordered mapping from formula term to dataset variable name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaTerms {
    terms: Vec<(String, String)>,
}

impl FormulaTerms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `"term: variable term: variable ..."`.
    pub fn parse(text: &str) -> GridResult<Self> {
        let mut terms = Vec::new();
        let mut pending: Option<String> = None;

        for token in text.split_whitespace() {
            // "term:variable" written without a space
            if let Some((term, var)) = token.split_once(':') {
                if !var.is_empty() {
                    if let Some(t) = pending.take() {
                        return Err(dangling(&t, text));
                    }
                    check_term(term, text)?;
                    terms.push((term.to_string(), var.to_string()));
                    continue;
                }
                if let Some(t) = pending.take() {
                    return Err(dangling(&t, text));
                }
                check_term(term, text)?;
                pending = Some(term.to_string());
                continue;
            }

            match pending.take() {
                Some(term) => terms.push((term, token.to_string())),
                None => {
                    return Err(GridError::invalid_argument(format!(
                        "formula_terms '{}': variable '{}' has no term",
                        text, token
                    )))
                }
            }
        }

        if let Some(t) = pending {
            return Err(dangling(&t, text));
        }
        Ok(Self { terms })
    }

    /// Builder-style insert.
    pub fn with(mut self, term: impl Into<String>, variable: impl Into<String>) -> Self {
        self.terms.push((term.into(), variable.into()));
        self
    }

    /// Variable name for a term.
    pub fn get(&self, term: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, v)| v.as_str())
    }

    /// Variable name for a term that the formula cannot do without.
    pub fn require(&self, transform: &str, term: &str) -> GridResult<&str> {
        self.get(term).ok_or_else(|| GridError::MissingFormulaTerm {
            transform: transform.to_string(),
            term: term.to_string(),
        })
    }

    pub fn contains(&self, term: &str) -> bool {
        self.get(term).is_some()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }
}

fn check_term(term: &str, text: &str) -> GridResult<()> {
    if term.is_empty() {
        return Err(GridError::invalid_argument(format!(
            "formula_terms '{}': empty term name",
            text
        )));
    }
    Ok(())
}

fn dangling(term: &str, text: &str) -> GridError {
    GridError::invalid_argument(format!(
        "formula_terms '{}': term '{}' has no variable",
        text, term
    ))
}

impl fmt::Display for FormulaTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .terms
            .iter()
            .map(|(t, v)| format!("{}: {}", t, v))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

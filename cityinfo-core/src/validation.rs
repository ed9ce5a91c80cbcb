//! Field constraints shared by cities and points of interest.
//!
//! Constraints are checked exhaustively: a failing payload reports every
//! offending field rather than stopping at the first one, so callers can
//! surface a complete list to the client.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Maximum number of characters accepted for a `name` field.
pub const NAME_MAX_CHARS: usize = 50;

/// Maximum number of characters accepted for a `description` field.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Identifies the field a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// The `name` field.
    Name,
    /// The `description` field.
    Description,
}

impl Field {
    /// Wire name of the field as it appears in payloads and patch paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single broken constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Violation {
    /// The field is absent, empty, or whitespace only.
    Required {
        /// Offending field.
        field: Field,
    },
    /// The field exceeds its length bound.
    TooLong {
        /// Offending field.
        field: Field,
        /// Maximum number of characters permitted.
        max: usize,
        /// Number of characters supplied.
        actual: usize,
    },
}

impl Violation {
    /// Field the violation refers to.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Required { field } | Self::TooLong { field, .. } => *field,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{field} is required"),
            Self::TooLong { field, max, actual } => write!(
                f,
                "{field} must be at most {max} characters (found {actual})"
            ),
        }
    }
}

/// Every constraint a payload broke.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("validation failed: {}", render(.violations))]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// All violations in field order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether any violation refers to `field`.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.violations.iter().any(|v| v.field() == field)
    }
}

/// Accumulates violations before turning them into a result.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub(crate) fn required_text(&mut self, field: Field, value: Option<&str>, max: usize) {
        match value {
            Some(text) if !text.trim().is_empty() => self.bounded(field, text, max),
            _ => self.violations.push(Violation::Required { field }),
        }
    }

    pub(crate) fn optional_text(&mut self, field: Field, value: Option<&str>, max: usize) {
        if let Some(text) = value {
            self.bounded(field, text, max);
        }
    }

    fn bounded(&mut self, field: Field, text: &str, max: usize) {
        let actual = text.chars().count();
        if actual > max {
            self.violations
                .push(Violation::TooLong { field, max, actual });
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                violations: self.violations,
            })
        }
    }
}

/// Validate a name/description pair using the shared bounds.
pub(crate) fn validate_named(
    name: Option<&str>,
    description: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut validator = Validator::default();
    validator.required_text(Field::Name, name, NAME_MAX_CHARS);
    validator.optional_text(Field::Description, description, DESCRIPTION_MAX_CHARS);
    validator.finish()
}

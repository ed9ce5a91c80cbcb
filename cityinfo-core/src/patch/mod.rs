//! Partial updates expressed as patch documents.
//!
//! A [`PatchDocument`] is an ordered list of [`PatchOperation`]s applied to
//! an [`EditablePointOfInterest`]: the projection of a point of interest onto
//! its mutable fields. Only `/name` and `/description` are addressable;
//! paths match ASCII case-insensitively and values must be JSON strings or
//! `null`.
//!
//! Application stops at the first failing operation. Operations applied
//! before it are not undone, so callers must discard the editable copy on
//! error rather than persist it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::validation::{ValidationErrors, validate_named};
use crate::{Field, PointOfInterest, PointOfInterestDraft};

mod apply;

pub use apply::{PartialUpdateError, apply_partial_update};

/// One step of a patch document.
///
/// Deserialises from the usual `{"op": ..., "path": ...}` objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    /// Set `path` to `value`. Both fields always exist, so this behaves
    /// like `replace`.
    Add {
        /// Target field path.
        path: String,
        /// New value.
        value: Value,
    },
    /// Clear `path`.
    Remove {
        /// Target field path.
        path: String,
    },
    /// Set `path` to `value`.
    Replace {
        /// Target field path.
        path: String,
        /// New value.
        value: Value,
    },
    /// Move the value at `from` to `path`, clearing `from`.
    Move {
        /// Source field path.
        from: String,
        /// Target field path.
        path: String,
    },
    /// Copy the value at `from` to `path`.
    Copy {
        /// Source field path.
        from: String,
        /// Target field path.
        path: String,
    },
    /// Assert that `path` currently holds `value`.
    Test {
        /// Target field path.
        path: String,
        /// Expected value.
        value: Value,
    },
}

impl PatchOperation {
    /// Lower-case operation name as it appears on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Replace { .. } => "replace",
            Self::Move { .. } => "move",
            Self::Copy { .. } => "copy",
            Self::Test { .. } => "test",
        }
    }

    /// Shorthand for a `replace` with a string value.
    pub fn replace(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Replace {
            path: path.into(),
            value: Value::String(value.into()),
        }
    }
}

/// Why a patch operation could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PatchErrorKind {
    /// The path does not name a patchable field.
    UnknownPath {
        /// Offending path.
        path: String,
    },
    /// The value is neither a string nor `null`.
    InvalidValue {
        /// Path the value was meant for.
        path: String,
    },
    /// A `test` operation found a different value.
    TestFailed {
        /// Path that was tested.
        path: String,
    },
}

impl fmt::Display for PatchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPath { path } => write!(f, "path '{path}' does not name a patchable field"),
            Self::InvalidValue { path } => write!(f, "value for '{path}' must be a string or null"),
            Self::TestFailed { path } => write!(f, "test of '{path}' failed"),
        }
    }
}

/// Structural failure of a patch document.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("patch operation {index} ({op}) failed: {kind}")]
pub struct PatchError {
    /// Zero-based position of the failing operation.
    pub index: usize,
    /// Name of the failing operation.
    pub op: &'static str,
    /// What went wrong.
    pub kind: PatchErrorKind,
}

/// The mutable fields of a point of interest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditablePointOfInterest {
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

impl From<&PointOfInterest> for EditablePointOfInterest {
    fn from(poi: &PointOfInterest) -> Self {
        Self {
            name: Some(poi.name.clone()),
            description: poi.description.clone(),
        }
    }
}

impl EditablePointOfInterest {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Description => &mut self.description,
        }
    }

    fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Description => self.description.as_deref(),
        }
    }

    /// Validate every field and turn the result into a replacement draft.
    ///
    /// # Errors
    /// Returns every violated constraint.
    pub fn into_draft(self) -> Result<PointOfInterestDraft, ValidationErrors> {
        validate_named(self.name.as_deref(), self.description.as_deref())?;
        Ok(PointOfInterestDraft::new(
            self.name.unwrap_or_default(),
            self.description,
        ))
    }
}

fn resolve(path: &str) -> Option<Field> {
    let name = path.strip_prefix('/')?;
    [Field::Name, Field::Description]
        .into_iter()
        .find(|field| field.as_str().eq_ignore_ascii_case(name))
}

fn text(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(text) => Some(Some(text.clone())),
        _ => None,
    }
}

/// An ordered list of patch operations.
///
/// # Examples
///
/// ```rust
/// use cityinfo_core::{EditablePointOfInterest, PatchDocument};
///
/// let document: PatchDocument = serde_json::from_str(
///     r#"[{"op": "replace", "path": "/name", "value": "A"},
///         {"op": "replace", "path": "/name", "value": "B"}]"#,
/// )
/// .expect("valid patch document");
/// let mut target = EditablePointOfInterest::default();
/// document.apply(&mut target).expect("paths are known");
/// assert_eq!(target.name.as_deref(), Some("B"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument {
    operations: Vec<PatchOperation>,
}

impl From<Vec<PatchOperation>> for PatchDocument {
    fn from(operations: Vec<PatchOperation>) -> Self {
        Self { operations }
    }
}

impl PatchDocument {
    /// Operations in application order.
    #[must_use]
    pub fn operations(&self) -> &[PatchOperation] {
        &self.operations
    }

    /// Apply every operation in order, stopping at the first failure.
    ///
    /// # Errors
    /// Returns [`PatchError`] naming the failing operation.
    pub fn apply(&self, target: &mut EditablePointOfInterest) -> Result<(), PatchError> {
        for (index, operation) in self.operations.iter().enumerate() {
            apply_one(operation, target).map_err(|kind| PatchError {
                index,
                op: operation.name(),
                kind,
            })?;
        }
        Ok(())
    }
}

fn field(path: &str) -> Result<Field, PatchErrorKind> {
    resolve(path).ok_or_else(|| PatchErrorKind::UnknownPath {
        path: path.to_owned(),
    })
}

fn value_for(path: &str, value: &Value) -> Result<Option<String>, PatchErrorKind> {
    text(value).ok_or_else(|| PatchErrorKind::InvalidValue {
        path: path.to_owned(),
    })
}

fn apply_one(
    operation: &PatchOperation,
    target: &mut EditablePointOfInterest,
) -> Result<(), PatchErrorKind> {
    match operation {
        PatchOperation::Add { path, value } | PatchOperation::Replace { path, value } => {
            let slot = field(path)?;
            *target.slot(slot) = value_for(path, value)?;
        }
        PatchOperation::Remove { path } => {
            *target.slot(field(path)?) = None;
        }
        PatchOperation::Move { from, path } => {
            let source = field(from)?;
            let destination = field(path)?;
            let moved = target.slot(source).take();
            *target.slot(destination) = moved;
        }
        PatchOperation::Copy { from, path } => {
            let source = field(from)?;
            let destination = field(path)?;
            let copied = target.value(source).map(str::to_owned);
            *target.slot(destination) = copied;
        }
        PatchOperation::Test { path, value } => {
            let tested = field(path)?;
            let expected = value_for(path, value)?;
            if target.value(tested) != expected.as_deref() {
                return Err(PatchErrorKind::TestFailed { path: path.clone() });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn target() -> EditablePointOfInterest {
        EditablePointOfInterest {
            name: Some("Central Park".into()),
            description: Some("Big".into()),
        }
    }

    fn document(value: Value) -> PatchDocument {
        serde_json::from_value(value).expect("decode patch document")
    }

    #[rstest]
    #[case(json!([{"op": "replace", "path": "/name", "value": "A"}]), Some("A"), Some("Big"))]
    #[case(json!([{"op": "add", "path": "/Description", "value": "Green"}]), Some("Central Park"), Some("Green"))]
    #[case(json!([{"op": "remove", "path": "/description"}]), Some("Central Park"), None)]
    #[case(json!([{"op": "move", "from": "/name", "path": "/description"}]), None, Some("Central Park"))]
    #[case(json!([{"op": "move", "from": "/name", "path": "/name"}]), Some("Central Park"), Some("Big"))]
    #[case(json!([{"op": "copy", "from": "/name", "path": "/description"}]), Some("Central Park"), Some("Central Park"))]
    #[case(json!([{"op": "test", "path": "/name", "value": "Central Park"}]), Some("Central Park"), Some("Big"))]
    #[case(json!([{"op": "replace", "path": "/description", "value": null}]), Some("Central Park"), None)]
    fn applies_operations(
        mut target: EditablePointOfInterest,
        #[case] patch: Value,
        #[case] name: Option<&str>,
        #[case] description: Option<&str>,
    ) {
        document(patch).apply(&mut target).expect("apply");
        assert_eq!(target.name.as_deref(), name);
        assert_eq!(target.description.as_deref(), description);
    }

    #[rstest]
    fn later_operations_win(mut target: EditablePointOfInterest) {
        let patch = PatchDocument::from(vec![
            PatchOperation::replace("/name", "A"),
            PatchOperation::replace("/name", "B"),
        ]);
        patch.apply(&mut target).expect("apply");
        assert_eq!(target.name.as_deref(), Some("B"));
    }

    #[rstest]
    #[case(json!([{"op": "replace", "path": "/id", "value": "7"}]), 0, PatchErrorKind::UnknownPath { path: "/id".into() })]
    #[case(json!([{"op": "replace", "path": "name", "value": "x"}]), 0, PatchErrorKind::UnknownPath { path: "name".into() })]
    #[case(json!([{"op": "replace", "path": "/name", "value": 5}]), 0, PatchErrorKind::InvalidValue { path: "/name".into() })]
    #[case(
        json!([
            {"op": "replace", "path": "/name", "value": "A"},
            {"op": "test", "path": "/name", "value": "B"}
        ]),
        1,
        PatchErrorKind::TestFailed { path: "/name".into() }
    )]
    fn stops_at_first_failure(
        mut target: EditablePointOfInterest,
        #[case] patch: Value,
        #[case] index: usize,
        #[case] kind: PatchErrorKind,
    ) {
        let err = document(patch).apply(&mut target).expect_err("patch fails");
        assert_eq!(err.index, index);
        assert_eq!(err.kind, kind);
    }

    #[rstest]
    fn failing_operation_leaves_later_ones_unapplied(mut target: EditablePointOfInterest) {
        let patch = document(json!([
            {"op": "replace", "path": "/name", "value": "A"},
            {"op": "remove", "path": "/unknown"},
            {"op": "replace", "path": "/name", "value": "C"}
        ]));
        let err = patch.apply(&mut target).expect_err("unknown path");
        assert_eq!(err.op, "remove");
        assert_eq!(target.name.as_deref(), Some("A"));
    }

    #[rstest]
    fn into_draft_reports_validation_separately(mut target: EditablePointOfInterest) {
        document(json!([{"op": "remove", "path": "/name"}]))
            .apply(&mut target)
            .expect("structurally valid");
        let err = target.into_draft().expect_err("name required");
        assert!(err.contains(Field::Name));
    }
}

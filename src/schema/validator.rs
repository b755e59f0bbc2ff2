//! Bridge to the generic schema-validation engine
//!
//! The descriptor tree is lowered to JSON Schema and compiled once; candidate
//! documents arrive already parsed. Engine errors are mapped to diagnostics
//! that name the offending field path and what was expected.

use jsonschema::{validator_for, ValidationError as EngineError, Validator as EngineValidator};
use miette::Diagnostic;
use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::schema::node::SchemaNode;

/// The lowered schema was rejected by the engine
#[derive(Debug, Error, Diagnostic)]
#[error("failed to compile document schema: {0}")]
#[diagnostic(code(chemked::schema::compile_error))]
pub struct SchemaCompileError(String);

/// Document rejected by the schema
#[derive(Debug, Error, Diagnostic)]
#[error("document validation failed: {summary}")]
#[diagnostic(code(chemked::schema::validation_error))]
pub struct ValidationError {
    summary: String,

    #[related]
    violations: Vec<Violation>,
}

impl ValidationError {
    fn new(violations: Vec<Violation>) -> Self {
        let count = violations.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };
        Self {
            summary,
            violations,
        }
    }

    /// All violations, in engine order
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Number of violations
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }
}

/// A single schema violation
#[derive(Debug, Error, Diagnostic)]
#[error("{path}: {message}")]
pub struct Violation {
    path: String,
    message: String,

    #[help]
    help: Option<String>,
}

impl Violation {
    /// Instance path of the offending value (`document root` at the top)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Human-readable description of the violation
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Document validator with a compiled schema
pub struct DocumentValidator {
    compiled: EngineValidator,
}

impl DocumentValidator {
    /// Lower the descriptor tree and compile it with the engine
    pub fn new(schema: &SchemaNode) -> Result<Self, SchemaCompileError> {
        let mut root = schema.to_json_schema();
        if let Some(object) = root.as_object_mut() {
            object.insert(
                "$schema".into(),
                json!("https://json-schema.org/draft/2020-12/schema"),
            );
        }
        let compiled = validator_for(&root).map_err(|e| SchemaCompileError(e.to_string()))?;
        Ok(Self { compiled })
    }

    /// Pass/fail check without error detail
    pub fn is_valid(&self, document: &JsonValue) -> bool {
        self.compiled.is_valid(document)
    }

    /// Validate a parsed document, collecting every violation
    pub fn validate(&self, document: &JsonValue) -> Result<(), ValidationError> {
        let violations: Vec<Violation> = self
            .compiled
            .iter_errors(document)
            .map(|error| to_violation(&error))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

/// Convert an engine error to our violation format
fn to_violation(error: &EngineError) -> Violation {
    let raw_path = error.instance_path.to_string();
    let path = if raw_path.is_empty() {
        "document root".to_string()
    } else {
        raw_path
    };
    Violation {
        path,
        message: format_engine_error(error),
        help: help_message(error),
    }
}

/// Format an engine error into a user-friendly message
fn format_engine_error(error: &EngineError) -> String {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("missing required field '{}'", name)
        }
        jsonschema::error::ValidationErrorKind::Type { kind } => {
            format!("wrong type: expected {:?}", kind)
        }
        jsonschema::error::ValidationErrorKind::Enum { options } => {
            format!("value must be one of: {}", format_enum_options(options))
        }
        jsonschema::error::ValidationErrorKind::Minimum { limit } => {
            format!("value is too small: minimum {}", limit)
        }
        jsonschema::error::ValidationErrorKind::Maximum { limit } => {
            format!("value is too large: maximum {}", limit)
        }
        jsonschema::error::ValidationErrorKind::MinItems { limit } => {
            format!("too few items: minimum {}", limit)
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("unknown field(s): {}", unexpected.join(", "))
        }
        _ => error.to_string(),
    }
}

/// Format enum options as a comma-separated string
fn format_enum_options(options: &JsonValue) -> String {
    if let Some(values) = options.as_array() {
        values
            .iter()
            .map(|v| {
                v.as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| v.to_string())
            })
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        options.to_string()
    }
}

/// Suggest a fix where one is obvious
fn help_message(error: &EngineError) -> Option<String> {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            Some(format!("add the '{}' field to the document", name))
        }
        jsonschema::error::ValidationErrorKind::Enum { options } => {
            Some(format!("valid values: {}", format_enum_options(options)))
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            if unexpected.len() == 1 {
                Some(format!("remove the '{}' field or check spelling", unexpected[0]))
            } else {
                Some("remove unknown fields or check spelling".to_string())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::document::document_schema;

    fn validator_for_year(year: i32) -> DocumentValidator {
        DocumentValidator::new(&document_schema(year)).unwrap()
    }

    /// A complete document that satisfies the schema
    fn sample_document() -> JsonValue {
        json!({
            "file-author": {"name": "Kyle Niemeyer", "ORCID": "0000-0003-4425-7097"},
            "file-version": "0",
            "chemked-version": "0.0.1",
            "reference": {
                "doi": "10.1016/j.ijhydene.2007.04.008",
                "authors": [{"name": "N. Chaumeix"}, {"name": "S. Pichon"}],
                "journal": "International Journal of Hydrogen Energy",
                "year": 2007,
                "volume": 32,
                "pages": "2216-2226",
            },
            "apparatus": {"kind": "shock tube", "institution": "CNRS-ICARE"},
            "common-properties": {
                "pressure": {"value": 220.0, "units": "kilopascal"},
                "composition": [
                    {"species": "H2", "InChI": "1S/H2/h1H", "mole-fraction": 0.00444},
                    {"species": "O2", "InChI": "1S/O2/c1-2", "mole-fraction": 0.00566},
                    {"species": "Ar", "InChI": "1S/Ar", "mole-fraction": 0.9899},
                ],
                "ignition-type": {"target": "pressure", "type": "d/dt max"},
            },
            "datapoints": [
                {
                    "temperature": {"value": 1164.48, "units": "kelvin"},
                    "ignition-delay": {"value": 471.54, "units": "microsecond"},
                    "pressure": {"value": 220.0, "units": "kilopascal"},
                },
                {
                    "temperature": {"value": 1264.2, "units": "kelvin"},
                    "ignition-delay": {"value": 291.57, "units": "microsecond"},
                    "volume-history": {
                        "time": {"units": "second", "column": 0},
                        "volume": {"units": "cm3", "column": 1},
                        "values": [[0.0, 5.47], [0.001, 5.46]],
                    },
                },
            ],
            "experiment-type": "ignition delay",
        })
    }

    #[test]
    fn test_sample_document_passes() {
        let validator = validator_for_year(2024);
        let result = validator.validate(&sample_document());
        assert!(result.is_ok(), "sample should pass: {:?}", result);
    }

    #[test]
    fn test_year_outside_bounds_rejected() {
        let validator = validator_for_year(2024);

        let mut early = sample_document();
        early["reference"]["year"] = json!(1599);
        let err = validator.validate(&early).unwrap_err();
        assert!(err
            .violations()
            .iter()
            .any(|v| v.path().contains("year") && v.message().contains("too small")));

        let mut late = sample_document();
        late["reference"]["year"] = json!(2026);
        assert!(validator.validate(&late).is_err());

        let mut next_year = sample_document();
        next_year["reference"]["year"] = json!(2025);
        assert!(validator.validate(&next_year).is_ok());
    }

    #[test]
    fn test_missing_datapoints_rejected() {
        let validator = validator_for_year(2024);
        let mut doc = sample_document();
        doc.as_object_mut().unwrap().remove("datapoints");
        let err = validator.validate(&doc).unwrap_err();
        assert!(err
            .violations()
            .iter()
            .any(|v| v.message().contains("datapoints")));
    }

    #[test]
    fn test_wrong_experiment_type_rejected() {
        let validator = validator_for_year(2024);
        let mut doc = sample_document();
        doc["experiment-type"] = json!("laminar flame speed");
        let err = validator.validate(&doc).unwrap_err();
        assert!(err
            .violations()
            .iter()
            .any(|v| v.message().contains("ignition delay")));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let validator = validator_for_year(2024);
        let mut doc = sample_document();
        doc["fuel-name"] = json!("hydrogen");
        let err = validator.validate(&doc).unwrap_err();
        assert!(err
            .violations()
            .iter()
            .any(|v| v.message().contains("fuel-name")));
    }

    #[test]
    fn test_negative_value_rejected() {
        let validator = validator_for_year(2024);
        let mut doc = sample_document();
        doc["datapoints"][0]["pressure"]["value"] = json!(-1.0);
        assert!(!validator.is_valid(&doc));
    }

    #[test]
    fn test_volume_history_pair_shape_enforced() {
        let validator = validator_for_year(2024);

        let mut triple = sample_document();
        triple["datapoints"][1]["volume-history"]["values"] = json!([[0.0, 5.47, 9.9]]);
        assert!(!validator.is_valid(&triple));

        let mut single = sample_document();
        single["datapoints"][1]["volume-history"]["values"] = json!([[0.0]]);
        assert!(!validator.is_valid(&single));
    }

    #[test]
    fn test_wrong_chemked_version_rejected() {
        let validator = validator_for_year(2024);
        let mut doc = sample_document();
        doc["chemked-version"] = json!("0.0.2");
        assert!(!validator.is_valid(&doc));
    }

    #[test]
    fn test_violations_carry_paths() {
        let validator = validator_for_year(2024);
        let mut doc = sample_document();
        doc["apparatus"]["kind"] = json!("flow reactor");
        let err = validator.validate(&doc).unwrap_err();
        assert_eq!(err.violation_count(), 1);
        assert!(err.violations()[0].path().contains("apparatus"));
    }
}

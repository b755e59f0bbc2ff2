//! ChemKED document schema
//!
//! Assembles the descriptor tree a ChemKED file must satisfy. Construction
//! is pure data assembly and cannot fail; validation itself is the engine's
//! job (see [`crate::schema::validator`]).
//!
//! Deliberately absent, matching the format reference: unit-string, InChI,
//! DOI, and ORCID format checks, and semantic version comparison for
//! `chemked-version` (a fixed literal for now).

use chrono::{Datelike, Utc};

use crate::schema::node::{fields, merge, Fields, SchemaNode};

/// The ChemKED format version accepted by the schema
pub const CHEMKED_VERSION: &str = "0.0.1";

/// Publication years earlier than this are rejected
const MIN_REFERENCE_YEAR: i64 = 1600;

/// Current wall-clock year (UTC)
///
/// Callers capture this once at startup and hand it to [`document_schema`];
/// the year bound stays fixed for the process lifetime and tests can inject
/// an arbitrary year instead.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Value-with-units record: non-negative magnitude plus a unit string
///
/// Used for pressure, temperature, ignition-delay, compression-time, and
/// pressure-rise alike. The unit string is not validated here.
pub fn value_unit_schema() -> SchemaNode {
    SchemaNode::dict(fields([
        ("value", SchemaNode::non_negative_float().required()),
        ("units", SchemaNode::string().required()),
    ]))
}

/// Mixture composition: a list of species entries by mole fraction
///
/// Mass-fraction composition is unsupported.
pub fn composition_schema() -> SchemaNode {
    SchemaNode::list(SchemaNode::dict(fields([
        ("species", SchemaNode::string().required()),
        ("InChI", SchemaNode::string().required()),
        ("mole-fraction", SchemaNode::float().required()),
    ])))
}

/// Ignition-onset definition: measured target and detection criterion
pub fn ignition_type_schema() -> SchemaNode {
    SchemaNode::dict(fields([
        ("target", SchemaNode::string().required()),
        (
            "type",
            SchemaNode::enumeration(["d/dt max", "max", "min"]).required(),
        ),
    ]))
}

/// Reactor volume trace: column specs plus `[time, volume]` pairs
pub fn volume_history_schema() -> SchemaNode {
    let column_spec = SchemaNode::dict(fields([
        ("units", SchemaNode::string().required()),
        ("column", SchemaNode::integer().required()),
    ]));
    SchemaNode::dict(fields([
        ("time", column_spec.clone().required()),
        ("volume", column_spec.required()),
        (
            "values",
            SchemaNode::list(SchemaNode::positional([
                SchemaNode::float(),
                SchemaNode::float(),
            ]))
            .required(),
        ),
    ]))
}

/// Person record: name plus optional ORCID
pub fn person_schema() -> SchemaNode {
    SchemaNode::dict(fields([
        ("name", SchemaNode::string().required()),
        ("ORCID", SchemaNode::string()),
    ]))
}

/// Bibliographic reference for the source publication
fn reference_schema(schema_year: i32) -> SchemaNode {
    SchemaNode::dict(fields([
        ("doi", SchemaNode::string()),
        ("authors", SchemaNode::list(person_schema()).required()),
        ("journal", SchemaNode::string().required()),
        (
            "year",
            SchemaNode::Integer {
                required: true,
                min: Some(MIN_REFERENCE_YEAR),
                max: Some(i64::from(schema_year) + 1),
            },
        ),
        (
            "volume",
            SchemaNode::Integer {
                required: true,
                min: Some(0),
                max: None,
            },
        ),
        ("pages", SchemaNode::string().required()),
        ("detail", SchemaNode::string()),
    ]))
    .required()
}

/// Experimental apparatus: kind plus optional provenance
fn apparatus_schema() -> SchemaNode {
    SchemaNode::dict(fields([
        (
            "kind",
            SchemaNode::enumeration(["shock tube", "rapid compression machine"]).required(),
        ),
        ("institution", SchemaNode::string()),
        ("facility", SchemaNode::string()),
    ]))
    .required()
}

/// Fields shared between `common-properties` and each datapoint
fn common_property_fields() -> Fields {
    fields([
        ("pressure", value_unit_schema()),
        ("composition", composition_schema()),
        ("ignition-type", ignition_type_schema()),
        ("pressure-rise", value_unit_schema()),
    ])
}

/// One experimental datapoint
///
/// Extends the shared property fields with the per-point measurements.
fn datapoint_schema() -> SchemaNode {
    SchemaNode::dict(merge([
        common_property_fields(),
        fields([
            ("temperature", value_unit_schema()),
            ("ignition-delay", value_unit_schema()),
            ("compression-time", value_unit_schema()),
            ("volume-history", volume_history_schema()),
        ]),
    ]))
}

/// The full ChemKED document descriptor
///
/// `schema_year` is the wall-clock year captured at construction; the
/// reference-year upper bound is `schema_year + 1` and is not re-evaluated
/// afterwards.
pub fn document_schema(schema_year: i32) -> SchemaNode {
    SchemaNode::dict(fields([
        ("file-author", person_schema().required()),
        ("file-version", SchemaNode::string().required()),
        (
            "chemked-version",
            SchemaNode::enumeration([CHEMKED_VERSION]).required(),
        ),
        ("reference", reference_schema(schema_year)),
        ("apparatus", apparatus_schema()),
        (
            "common-properties",
            SchemaNode::dict(common_property_fields()),
        ),
        (
            "datapoints",
            SchemaNode::list(datapoint_schema()).required(),
        ),
        (
            "experiment-type",
            SchemaNode::enumeration(["ignition delay"]).required(),
        ),
    ]))
}

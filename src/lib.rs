//! ChemKED: schema and species tables for the chemical-kinetics
//! experimental-data interchange format
//!
//! Builds the typed descriptor tree a ChemKED YAML document must satisfy,
//! lowers it to JSON Schema for a generic validation engine, and carries the
//! fixed registry translating between InChI identifiers, short species names,
//! and display names.

pub mod cli;
pub mod schema;
pub mod species;

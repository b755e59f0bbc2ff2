//! Species registry
//!
//! Fixed three-way mapping between InChI structure strings, short internal
//! species names, and human-readable display names, for the species
//! registered with the format. Built once at startup and read-only
//! afterwards; iteration order is the registration order, which is also the
//! row order of the formatted table.

use indexmap::IndexMap;
use miette::Diagnostic;
use std::collections::HashMap;
use thiserror::Error;

/// A registered chemical species
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Species {
    /// Compact internal identifier, e.g. `nC7H16`
    pub short_name: &'static str,
    /// InChI structure string, without the `InChI=` prefix
    pub inchi: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
}

/// Species registered with the format, in table order
const SPECIES: &[Species] = &[
    Species {
        short_name: "nC7H16",
        inchi: "1S/C7H16/c1-3-5-7-6-4-2/h3-7H2,1-2H3",
        display_name: "n-heptane",
    },
    Species {
        short_name: "iC8H18",
        inchi: "1S/C8H18/c1-7(2)6-8(3,4)5/h7H,6H2,1-5H3",
        display_name: "isooctane",
    },
    Species {
        short_name: "C6H5CH3",
        inchi: "1S/C7H8/c1-7-5-3-2-4-6-7/h2-6H,1H3",
        display_name: "toluene",
    },
    Species {
        short_name: "C2H5OH",
        inchi: "1S/C2H6O/c1-2-3/h3H,2H2,1H3",
        display_name: "ethanol",
    },
    Species {
        short_name: "O2",
        inchi: "1S/O2/c1-2",
        display_name: "oxygen",
    },
    Species {
        short_name: "N2",
        inchi: "1S/N2/c1-2",
        display_name: "nitrogen",
    },
    Species {
        short_name: "Ar",
        inchi: "1S/Ar",
        display_name: "argon",
    },
    Species {
        short_name: "He",
        inchi: "1S/He",
        display_name: "helium",
    },
    Species {
        short_name: "CO2",
        inchi: "1S/CO2/c2-1-3",
        display_name: "carbon dioxide",
    },
    Species {
        short_name: "H2",
        inchi: "1S/H2/h1H",
        display_name: "hydrogen",
    },
    Species {
        short_name: "H2O",
        inchi: "1S/H2O/h1H2",
        display_name: "water",
    },
];

/// Tab stops are every eight columns when measuring rendered width
const TAB_WIDTH: usize = 8;

/// Errors raised by registry lookups
#[derive(Debug, Error, Diagnostic)]
pub enum RegistryError {
    /// The identifier is not one of the registered species
    #[error("unknown species identifier: '{0}'")]
    #[diagnostic(
        code(chemked::species::key_not_found),
        help("run `chemked species` to list the registered species")
    )]
    KeyNotFound(String),
}

/// Read-only lookup between the three species identifier spaces
#[derive(Debug, Clone)]
pub struct SpeciesRegistry {
    by_short: IndexMap<&'static str, &'static Species>,
    by_inchi: HashMap<&'static str, &'static Species>,
}

impl SpeciesRegistry {
    /// Build the fixed registry
    pub fn new() -> Self {
        let mut by_short = IndexMap::with_capacity(SPECIES.len());
        let mut by_inchi = HashMap::with_capacity(SPECIES.len());
        for species in SPECIES {
            by_short.insert(species.short_name, species);
            by_inchi.insert(species.inchi, species);
        }
        Self { by_short, by_inchi }
    }

    /// Number of registered species
    pub fn len(&self) -> usize {
        self.by_short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_short.is_empty()
    }

    /// Iterate species in registration order
    pub fn iter(&self) -> impl Iterator<Item = &'static Species> + '_ {
        self.by_short.values().copied()
    }

    /// Look up a species record by short name
    pub fn get(&self, short_name: &str) -> Result<&'static Species, RegistryError> {
        self.by_short
            .get(short_name)
            .copied()
            .ok_or_else(|| RegistryError::KeyNotFound(short_name.to_string()))
    }

    /// Translate an InChI string to the short species name
    pub fn inchi_to_short(&self, inchi: &str) -> Result<&'static str, RegistryError> {
        self.by_inchi
            .get(inchi)
            .map(|species| species.short_name)
            .ok_or_else(|| RegistryError::KeyNotFound(inchi.to_string()))
    }

    /// Translate a short species name to its InChI string
    pub fn short_to_inchi(&self, short_name: &str) -> Result<&'static str, RegistryError> {
        self.get(short_name).map(|species| species.inchi)
    }

    /// Translate a short species name to its display name
    pub fn short_to_display(&self, short_name: &str) -> Result<&'static str, RegistryError> {
        self.get(short_name).map(|species| species.display_name)
    }

    /// Render the registry as a table: display name, short name, InChI key
    ///
    /// One row per species in registration order, after a header row and a
    /// dash separator matching the header's rendered width.
    pub fn format_species_table(&self) -> String {
        let longest = self
            .iter()
            .map(|species| species.display_name.len())
            .max()
            .unwrap_or(0);

        let header = format!("{:<width$} Short name\tInChI key", "Species name", width = longest);
        let mut table = String::new();
        table.push_str(&header);
        table.push('\n');
        table.push_str(&"-".repeat(expanded_width(&header)));
        table.push('\n');

        for species in self.iter() {
            table.push_str(&format!(
                "{:<width$} {:<10}\t{}\n",
                species.display_name,
                species.short_name,
                species.inchi,
                width = longest,
            ));
        }
        table
    }
}

impl Default for SpeciesRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Width of a line once tabs are expanded to the next tab stop
fn expanded_width(line: &str) -> usize {
    let mut width = 0;
    for ch in line.chars() {
        if ch == '\t' {
            width += TAB_WIDTH - width % TAB_WIDTH;
        } else {
            width += 1;
        }
    }
    width
}

//! Test catalog - the validation domain for lab results.
//!
//! A [`Catalog`] holds the recognized test definitions (name, unit, numeric
//! range) and the set of registered patient identifiers. It is fixed at
//! construction and shared read-only between sessions, typically as
//! `Arc<Catalog>`.
//!
//! Catalogs come from three places:
//! - [`Catalog::builtin`] - the fixed table of the reference instrument tool
//! - [`Catalog::new`] - programmatic construction with validation
//! - [`Catalog::from_toml_str`] - a TOML catalog file
//!
//! # Catalog file format
//!
//! ```toml
//! patients = ["PATIENT001", "PATIENT002"]
//!
//! [[tests]]
//! name = "GLUCOSE"
//! unit = "mg/dL"
//! min = 70
//! max = 140
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

use crate::error::{LabwireError, Result};

/// One catalog entry: a recognized test with its unit and inclusive range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestDefinition {
    /// Exact, case-sensitive test name (e.g. "GLUCOSE").
    pub name: String,
    /// Exact unit string (e.g. "mg/dL"); compared by string equality only.
    pub unit: String,
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

impl TestDefinition {
    /// Create a new test definition.
    pub fn new(name: &str, unit: &str, min: f64, max: f64) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            min,
            max,
        }
    }

    /// Whether both bounds are integer-valued.
    ///
    /// Integer-valued tests render their values without a decimal point on
    /// encode; decimal-valued tests render to one decimal place.
    pub fn is_integer_valued(&self) -> bool {
        self.min.fract() == 0.0 && self.max.fract() == 0.0
    }

    /// Whether a value falls inside `[min, max]` inclusive.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A validated patient identifier.
///
/// The registration pattern is `PATIENT` followed by exactly three ASCII
/// digits. The codec never fabricates identifiers; a well-formed but
/// unregistered identifier is still rejected on decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatientId(String);

impl PatientId {
    /// Parse and validate a patient identifier.
    pub fn parse(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("PATIENT")
            .filter(|rest| rest.len() == 3 && rest.bytes().all(|b| b.is_ascii_digit()));

        match digits {
            Some(_) => Ok(Self(s.to_string())),
            None => Err(LabwireError::Catalog(format!(
                "invalid patient id: {s:?}"
            ))),
        }
    }

    /// The identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    tests: Vec<TestDefinition>,
    patients: Vec<String>,
}

/// The fixed table of recognized tests and registered patients.
///
/// Immutable after construction; the only resource shared between sessions.
#[derive(Debug, Clone)]
pub struct Catalog {
    tests: Vec<TestDefinition>,
    patients: HashSet<String>,
}

impl Catalog {
    /// Build a catalog, validating every entry.
    ///
    /// # Errors
    ///
    /// - a test with `min > max`
    /// - a patient identifier that fails [`PatientId::parse`]
    pub fn new(tests: Vec<TestDefinition>, patients: Vec<String>) -> Result<Self> {
        for test in &tests {
            if test.min > test.max {
                return Err(LabwireError::Catalog(format!(
                    "test {:?} has min {} > max {}",
                    test.name, test.min, test.max
                )));
            }
        }
        for patient in &patients {
            PatientId::parse(patient)?;
        }

        Ok(Self {
            tests,
            patients: patients.into_iter().collect(),
        })
    }

    /// Parse a TOML catalog file, then validate it like [`Catalog::new`].
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(input)?;
        Self::new(file.tests, file.patients)
    }

    /// The catalog of the reference instrument tool.
    ///
    /// GLUCOSE 70-140 mg/dL, HEMOGLOBIN 12.0-17.5 g/dL, CHOLESTEROL
    /// 120-240 mg/dL; patients PATIENT001 through PATIENT003.
    pub fn builtin() -> Self {
        Self {
            tests: vec![
                TestDefinition::new("GLUCOSE", "mg/dL", 70.0, 140.0),
                TestDefinition::new("HEMOGLOBIN", "g/dL", 12.0, 17.5),
                TestDefinition::new("CHOLESTEROL", "mg/dL", 120.0, 240.0),
            ],
            patients: ["PATIENT001", "PATIENT002", "PATIENT003"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Look up a test by exact, case-sensitive name.
    pub fn test(&self, name: &str) -> Option<&TestDefinition> {
        self.tests.iter().find(|t| t.name == name)
    }

    /// Whether a patient identifier is registered.
    pub fn is_registered(&self, patient: &str) -> bool {
        self.patients.contains(patient)
    }

    /// All test definitions, in catalog order.
    pub fn tests(&self) -> &[TestDefinition] {
        &self.tests
    }

    /// Number of registered patients.
    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_contents() {
        let catalog = Catalog::builtin();

        let glucose = catalog.test("GLUCOSE").unwrap();
        assert_eq!(glucose.unit, "mg/dL");
        assert_eq!(glucose.min, 70.0);
        assert_eq!(glucose.max, 140.0);
        assert!(glucose.is_integer_valued());

        let hemoglobin = catalog.test("HEMOGLOBIN").unwrap();
        assert_eq!(hemoglobin.unit, "g/dL");
        assert!(!hemoglobin.is_integer_valued());

        assert!(catalog.test("CHOLESTEROL").is_some());
        assert!(catalog.test("UNKNOWNTEST").is_none());
        assert_eq!(catalog.tests().len(), 3);
        assert_eq!(catalog.patient_count(), 3);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let catalog = Catalog::builtin();
        assert!(catalog.test("glucose").is_none());
        assert!(!catalog.is_registered("patient001"));
    }

    #[test]
    fn test_patient_id_parse() {
        assert!(PatientId::parse("PATIENT001").is_ok());
        assert!(PatientId::parse("PATIENT999").is_ok());
        assert!(PatientId::parse("").is_err());
        assert!(PatientId::parse("PATIENT").is_err());
        assert!(PatientId::parse("PATIENT1").is_err());
        assert!(PatientId::parse("PATIENT0001").is_err());
        assert!(PatientId::parse("PATIENTabc").is_err());
        assert!(PatientId::parse("patient001").is_err());
    }

    #[test]
    fn test_registered_vs_well_formed() {
        let catalog = Catalog::builtin();
        // Well-formed but unregistered.
        assert!(PatientId::parse("PATIENT999").is_ok());
        assert!(!catalog.is_registered("PATIENT999"));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let def = TestDefinition::new("GLUCOSE", "mg/dL", 70.0, 140.0);
        assert!(def.contains(70.0));
        assert!(def.contains(140.0));
        assert!(!def.contains(69.9));
        assert!(!def.contains(140.1));
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        let result = Catalog::new(
            vec![TestDefinition::new("X", "u", 10.0, 1.0)],
            vec!["PATIENT001".to_string()],
        );
        assert!(matches!(result, Err(LabwireError::Catalog(_))));
    }

    #[test]
    fn test_new_rejects_bad_patient_id() {
        let result = Catalog::new(vec![], vec!["NURSE001".to_string()]);
        assert!(matches!(result, Err(LabwireError::Catalog(_))));
    }

    #[test]
    fn test_from_toml_str() {
        let catalog = Catalog::from_toml_str(
            r#"
            patients = ["PATIENT001", "PATIENT002"]

            [[tests]]
            name = "GLUCOSE"
            unit = "mg/dL"
            min = 70
            max = 140

            [[tests]]
            name = "HEMOGLOBIN"
            unit = "g/dL"
            min = 12.0
            max = 17.5
            "#,
        )
        .unwrap();

        assert_eq!(catalog.tests().len(), 2);
        assert!(catalog.test("GLUCOSE").unwrap().is_integer_valued());
        assert!(!catalog.test("HEMOGLOBIN").unwrap().is_integer_valued());
        assert!(catalog.is_registered("PATIENT002"));
        assert!(!catalog.is_registered("PATIENT003"));
    }

    #[test]
    fn test_from_toml_str_rejects_invalid() {
        assert!(Catalog::from_toml_str("not toml at all [").is_err());

        let result = Catalog::from_toml_str(
            r#"
            patients = ["BOGUS"]
            tests = []
            "#,
        );
        assert!(matches!(result, Err(LabwireError::Catalog(_))));
    }
}

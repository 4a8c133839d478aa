//! Codec - translation between [`LabResult`] and wire frames.
//!
//! The codec is pure: encoding builds a delimited frame from a result,
//! decoding classifies a raw byte sequence against the catalog. It holds no
//! state beyond a shared [`Catalog`], so repeated calls over the same bytes
//! always classify the same way.
//!
//! Encoding performs NO escaping or sanitization. Separators and control
//! bytes embedded in caller-supplied strings are framed faithfully; rejecting
//! them is the collector's job, and the adversarial probes rely on the codec
//! not filtering anything.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use labwire::{Catalog, Codec, LabResult, PatientId, ValidationOutcome};
//!
//! let codec = Codec::new(Arc::new(Catalog::builtin()));
//! let result = LabResult::new(
//!     PatientId::parse("PATIENT001").unwrap(),
//!     "GLUCOSE",
//!     120.0,
//!     "mg/dL",
//! );
//!
//! let frame = codec.encode(&result);
//! assert_eq!(
//!     codec.decode_and_validate(frame.as_bytes()),
//!     ValidationOutcome::Valid(result),
//! );
//! ```

use std::sync::Arc;

use crate::catalog::{Catalog, PatientId};
use crate::protocol::{Frame, ETX, FIELD_COUNT, FIELD_SEPARATOR, STX};

/// One lab reading, ready to encode.
///
/// Transient value object: created by a caller, consumed by encoding, never
/// mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct LabResult {
    /// Validated patient identifier.
    pub patient_id: PatientId,
    /// Test name, expected (but not forced) to exist in the catalog.
    pub test_name: String,
    /// Numeric reading.
    pub value: f64,
    /// Unit string as reported by the instrument.
    pub unit: String,
}

impl LabResult {
    /// Create a new lab result.
    pub fn new(patient_id: PatientId, test_name: &str, value: f64, unit: &str) -> Self {
        Self {
            patient_id,
            test_name: test_name.to_string(),
            value,
            unit: unit.to_string(),
        }
    }
}

/// Classification of a received frame against the catalog.
///
/// Exactly one outcome per frame; the first failing check wins, in the order
/// the variants are documented here. These are reporting categories, never
/// errors - no classification aborts a session.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Missing STX or ETX, embedded delimiter, non-UTF-8 text, or a field
    /// count other than four.
    Malformed,
    /// Patient identifier is not in the registered set.
    UnknownPatient,
    /// Test name is not in the catalog.
    UnknownTest,
    /// Unit differs from the catalog unit for this test (string equality,
    /// case-sensitive, no conversion).
    UnitMismatch,
    /// Value field fails numeric parsing.
    NotNumeric,
    /// Value parsed but falls outside `[min, max]` inclusive.
    OutOfRange,
    /// All checks passed; carries the parsed result.
    Valid(LabResult),
}

impl ValidationOutcome {
    /// Stable lowercase tag for logs and probe reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::UnknownPatient => "unknown-patient",
            Self::UnknownTest => "unknown-test",
            Self::UnitMismatch => "unit-mismatch",
            Self::NotNumeric => "not-numeric",
            Self::OutOfRange => "out-of-range",
            Self::Valid(_) => "valid",
        }
    }

    /// Whether this is the `Valid` outcome.
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Encoder/validator over a shared catalog.
#[derive(Debug, Clone)]
pub struct Codec {
    catalog: Arc<Catalog>,
}

impl Codec {
    /// Create a codec over the given catalog.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// The catalog this codec validates against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Encode a result as `STX + patientId|testName|value|unit + ETX`.
    ///
    /// The value renders without a decimal point when the catalog entry is
    /// integer-valued, and to one decimal place when either bound is
    /// decimal-valued.
    pub fn encode(&self, result: &LabResult) -> Frame {
        let value = self.format_value(&result.test_name, result.value);
        let sep = FIELD_SEPARATOR;
        let text = format!(
            "{}{sep}{}{sep}{value}{sep}{}",
            result.patient_id, result.test_name, result.unit
        );
        Frame::from_payload(&text)
    }

    /// Render a value according to the catalog entry for `test_name`.
    ///
    /// For a test name absent from the catalog: integer rendering when the
    /// value has no fractional part, shortest f64 rendering otherwise.
    fn format_value(&self, test_name: &str, value: f64) -> String {
        match self.catalog.test(test_name) {
            Some(def) if def.is_integer_valued() => format!("{}", value as i64),
            Some(_) => format!("{value:.1}"),
            None if value.fract() == 0.0 => format!("{}", value as i64),
            None => format!("{value}"),
        }
    }

    /// Parse and classify a raw frame.
    ///
    /// Check order (first failure wins): framing, UTF-8, field count,
    /// patient, test name, unit, numeric parse, range.
    pub fn decode_and_validate(&self, raw: &[u8]) -> ValidationOutcome {
        use ValidationOutcome::*;

        if raw.len() < 2 || raw[0] != STX || raw[raw.len() - 1] != ETX {
            return Malformed;
        }
        let interior = &raw[1..raw.len() - 1];
        if interior.iter().any(|&b| b == STX || b == ETX) {
            return Malformed;
        }
        let text = match std::str::from_utf8(interior) {
            Ok(text) => text,
            Err(_) => return Malformed,
        };

        let fields: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Malformed;
        }

        let patient_id = match PatientId::parse(fields[0]) {
            Ok(id) if self.catalog.is_registered(id.as_str()) => id,
            _ => return UnknownPatient,
        };

        let def = match self.catalog.test(fields[1]) {
            Some(def) => def,
            None => return UnknownTest,
        };

        if fields[3] != def.unit {
            return UnitMismatch;
        }

        let value: f64 = match fields[2].parse() {
            Ok(value) => value,
            Err(_) => return NotNumeric,
        };

        if !def.contains(value) {
            return OutOfRange;
        }

        Valid(LabResult {
            patient_id,
            test_name: def.name.clone(),
            value,
            unit: def.unit.clone(),
        })
    }

    /// Classify a [`Frame`] (convenience over the byte-slice form).
    pub fn validate_frame(&self, frame: &Frame) -> ValidationOutcome {
        self.decode_and_validate(frame.as_bytes())
    }
}

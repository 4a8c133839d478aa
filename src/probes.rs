//! Adversarial probe set.
//!
//! A fixed, labelled list of hostile byte sequences used to exercise the
//! collector's validation: bad identifiers, bad values, broken framing, and
//! an injection attempt. The codec frames nothing here - every probe is raw
//! bytes, placed on the wire exactly as written.

use bytes::Bytes;

/// One labelled probe: raw bytes plus a human-readable description for the
/// audit report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// What this probe exercises.
    pub label: &'static str,
    /// Exact bytes to place on the wire.
    pub bytes: Bytes,
}

impl Probe {
    /// Create a probe from a static byte sequence.
    pub const fn from_static(label: &'static str, bytes: &'static [u8]) -> Self {
        Self {
            label,
            bytes: Bytes::from_static(bytes),
        }
    }
}

/// The standard set of clearly invalid messages.
pub fn adversarial_probes() -> Vec<Probe> {
    vec![
        Probe::from_static(
            "unknown patient, out-of-range value",
            b"\x02PATIENT999|GLUCOSE|-999|mg/dL\x03",
        ),
        Probe::from_static("unknown test", b"\x02PATIENT001|UNKNOWNTEST|123|mg/dL\x03"),
        Probe::from_static("value out of range", b"\x02PATIENT002|GLUCOSE|9999|mg/dL\x03"),
        Probe::from_static("wrong unit", b"\x02PATIENT003|HEMOGLOBIN|15|mg/L\x03"),
        Probe::from_static("missing patient id", b"\x02|GLUCOSE|100|mg/dL\x03"),
        Probe::from_static("non-numeric value", b"\x02PATIENT001|GLUCOSE|abc|mg/dL\x03"),
        Probe::from_static("missing value", b"\x02PATIENT002|HEMOGLOBIN||g/dL\x03"),
        Probe::from_static("missing STX/ETX", b"PATIENT003|CHOLESTEROL|180|mg/dL"),
        Probe::from_static(
            "injection attempt",
            b"\x02PATIENT001|GLUCOSE|120|mg/dL<script>bad()</script>\x03",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::Catalog;
    use crate::codec::{Codec, ValidationOutcome};

    #[test]
    fn test_probe_count_and_labels_unique() {
        let probes = adversarial_probes();
        assert_eq!(probes.len(), 9);

        let mut labels: Vec<_> = probes.iter().map(|p| p.label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 9);
    }

    #[test]
    fn test_no_probe_is_valid() {
        let codec = Codec::new(Arc::new(Catalog::builtin()));
        for probe in adversarial_probes() {
            let outcome = codec.decode_and_validate(&probe.bytes);
            assert!(!outcome.is_valid(), "probe {:?} classified valid", probe.label);
        }
    }

    #[test]
    fn test_probe_classifications() {
        let codec = Codec::new(Arc::new(Catalog::builtin()));
        let probes = adversarial_probes();

        let expect = [
            ValidationOutcome::UnknownPatient,
            ValidationOutcome::UnknownTest,
            ValidationOutcome::OutOfRange,
            ValidationOutcome::UnitMismatch,
            ValidationOutcome::UnknownPatient,
            ValidationOutcome::NotNumeric,
            ValidationOutcome::NotNumeric,
            ValidationOutcome::Malformed,
            ValidationOutcome::UnitMismatch,
        ];

        for (probe, expected) in probes.iter().zip(expect) {
            assert_eq!(
                codec.decode_and_validate(&probe.bytes),
                expected,
                "wrong classification for {:?}",
                probe.label
            );
        }
    }
}

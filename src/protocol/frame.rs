//! Frame type for one delimited record.
//!
//! A [`Frame`] is the complete byte sequence that crosses the wire for one
//! record, delimiters included. Uses `bytes::Bytes` for cheap cloning.
//!
//! A `Frame` may carry arbitrary bytes: adversarial probes travel through the
//! same plumbing as well-formed records, and only
//! [`Codec::decode_and_validate`](crate::codec::Codec::decode_and_validate)
//! decides what they mean.
//!
//! # Example
//!
//! ```
//! use labwire::protocol::Frame;
//!
//! let frame = Frame::from_payload("PATIENT001|GLUCOSE|120|mg/dL");
//! assert!(frame.is_delimited());
//! assert_eq!(frame.interior(), Some(&b"PATIENT001|GLUCOSE|120|mg/dL"[..]));
//! ```

use bytes::Bytes;

use super::wire_format::{ETX, STX};

/// A complete wire frame: `STX + payload + ETX` when well-formed, or any raw
/// byte sequence when built adversarially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Build a frame around a payload, adding the STX/ETX delimiters.
    ///
    /// No escaping is performed: delimiters or separators embedded in the
    /// payload are framed faithfully. The collector's validation, not this
    /// constructor, rejects such frames.
    pub fn from_payload(payload: &str) -> Self {
        let mut buf = Vec::with_capacity(payload.len() + 2);
        buf.push(STX);
        buf.extend_from_slice(payload.as_bytes());
        buf.push(ETX);
        Self { bytes: buf.into() }
    }

    /// Wrap raw bytes as-is, delimiters not added.
    ///
    /// Used for adversarial probes that deliberately violate the framing.
    pub fn from_raw(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The full wire bytes, delimiters included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the frame and take the underlying bytes.
    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Total wire length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the frame carries no bytes at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the frame starts with STX and ends with ETX.
    ///
    /// This is the framing check only; it says nothing about field count or
    /// semantic validity.
    pub fn is_delimited(&self) -> bool {
        self.bytes.len() >= 2
            && self.bytes[0] == STX
            && self.bytes[self.bytes.len() - 1] == ETX
    }

    /// The bytes between the delimiters, or `None` if the frame is not
    /// properly delimited.
    pub fn interior(&self) -> Option<&[u8]> {
        if self.is_delimited() {
            Some(&self.bytes[1..self.bytes.len() - 1])
        } else {
            None
        }
    }
}

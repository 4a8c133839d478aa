//! Wire format constants for the framed record protocol.
//!
//! One record travels as a delimited byte sequence:
//!
//! ```text
//! ┌──────┬──────────────────────────────────────────┬──────┐
//! │ STX  │ patientId|testName|value|unit  (UTF-8)   │ ETX  │
//! │ 0x02 │ 4 fields, '|' separated                  │ 0x03 │
//! └──────┴──────────────────────────────────────────┴──────┘
//! ```
//!
//! Control bytes outside the frame:
//! - `EOT` (0x04): sent by the client when voluntarily closing a session.
//! - `ACK` (0x06): collector accepted one record.
//! - `NAK` (0x15): collector rejected one record.

/// Start-of-text marker opening every record frame.
pub const STX: u8 = 0x02;

/// End-of-text marker closing every record frame.
pub const ETX: u8 = 0x03;

/// End-of-transmission byte, sent on voluntary session close.
pub const EOT: u8 = 0x04;

/// Positive acknowledgement byte from the collector.
pub const ACK: u8 = 0x06;

/// Negative acknowledgement byte from the collector.
pub const NAK: u8 = 0x15;

/// Field separator inside the frame text.
pub const FIELD_SEPARATOR: char = '|';

/// Exact number of pipe-separated fields in a well-formed record.
pub const FIELD_COUNT: usize = 4;

/// Default maximum frame size accepted by [`FrameBuffer`](super::FrameBuffer).
///
/// Matches the collector's receive buffer size.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 4096;

/// Check whether a byte is one of the frame delimiters.
#[inline]
pub fn is_delimiter(byte: u8) -> bool {
    byte == STX || byte == ETX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_byte_values() {
        assert_eq!(STX, b'\x02');
        assert_eq!(ETX, b'\x03');
        assert_eq!(EOT, b'\x04');
        assert_eq!(ACK, b'\x06');
        assert_eq!(NAK, b'\x15');
    }

    #[test]
    fn test_is_delimiter() {
        assert!(is_delimiter(STX));
        assert!(is_delimiter(ETX));
        assert!(!is_delimiter(EOT));
        assert!(!is_delimiter(b'|'));
        assert!(!is_delimiter(b'A'));
    }
}

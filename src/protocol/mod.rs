//! Protocol module - wire format, framing, and frame types.
//!
//! This module implements the delimited record protocol:
//! - Control byte constants (STX/ETX/EOT/ACK/NAK)
//! - Frame type for one delimited record
//! - Frame buffer for reassembling frames from partial reads

mod frame;
mod frame_buffer;
mod wire_format;

pub use frame::Frame;
pub use frame_buffer::FrameBuffer;
pub use wire_format::{
    is_delimiter, ACK, DEFAULT_MAX_FRAME_SIZE, EOT, ETX, FIELD_COUNT, FIELD_SEPARATOR, NAK, STX,
};

//! Frame buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for zero-copy buffer management and a small state
//! machine over the stream:
//! - `SeekingStx`: discard garbage until a start marker appears
//! - `Collecting`: buffer starts with STX, wait for the closing ETX
//!
//! This is the stream-reassembly half of the protocol contract: the collector
//! (and the mock collector used in tests) feeds raw socket reads in and gets
//! complete delimited frames back, regardless of how the transport fragmented
//! them.
//!
//! # Example
//!
//! ```
//! use labwire::protocol::FrameBuffer;
//!
//! let mut buffer = FrameBuffer::new();
//!
//! let frames = buffer.push(b"\x02PATIENT001|GLUCOSE|120|mg/dL\x03").unwrap();
//! assert_eq!(frames.len(), 1);
//! ```

use bytes::BytesMut;

use super::wire_format::{DEFAULT_MAX_FRAME_SIZE, ETX, STX};
use super::Frame;
use crate::error::{LabwireError, Result};

/// State machine for frame extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Looking for the next STX; anything before it is garbage.
    SeekingStx,
    /// Buffer starts with STX; waiting for the closing ETX.
    Collecting,
}

/// Buffer for accumulating incoming bytes and extracting complete frames.
///
/// Bytes before a start marker are discarded so the stream re-synchronizes on
/// the next frame instead of poisoning everything after one bad prefix.
pub struct FrameBuffer {
    /// Accumulated bytes from socket reads.
    buffer: BytesMut,
    /// Current extraction state.
    state: State,
    /// Maximum allowed frame size (delimiters included).
    max_frame_size: usize,
}

impl FrameBuffer {
    /// Create a new frame buffer with the default maximum frame size.
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Create a new frame buffer with a custom maximum frame size.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(DEFAULT_MAX_FRAME_SIZE),
            state: State::SeekingStx,
            max_frame_size,
        }
    }

    /// Push data into the buffer and extract all complete frames.
    ///
    /// Returns every frame completed by this push, in arrival order.
    /// Fragmented data is kept internally for the next push.
    ///
    /// # Errors
    ///
    /// Returns [`LabwireError::FrameTooLarge`] when an unterminated frame
    /// grows past the configured maximum.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.try_extract_one()? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Try to extract a single frame from the buffer.
    ///
    /// Returns:
    /// - `Ok(Some(frame))` if a complete frame was extracted
    /// - `Ok(None)` if more data is needed
    /// - `Err(...)` if the frame in progress is oversized
    fn try_extract_one(&mut self) -> Result<Option<Frame>> {
        match self.state {
            State::SeekingStx => {
                match self.buffer.iter().position(|&b| b == STX) {
                    None => {
                        if !self.buffer.is_empty() {
                            tracing::warn!(
                                discarded = self.buffer.len(),
                                "discarding bytes with no start marker"
                            );
                            self.buffer.clear();
                        }
                        Ok(None)
                    }
                    Some(pos) => {
                        if pos > 0 {
                            tracing::warn!(discarded = pos, "resynchronizing to next start marker");
                            let _ = self.buffer.split_to(pos);
                        }
                        self.state = State::Collecting;
                        self.try_extract_one()
                    }
                }
            }

            State::Collecting => {
                // Invariant: buffer[0] == STX.
                match self.buffer.iter().position(|&b| b == ETX) {
                    Some(etx_pos) => {
                        let raw = self.buffer.split_to(etx_pos + 1).freeze();
                        self.state = State::SeekingStx;
                        Ok(Some(Frame::from_raw(raw)))
                    }
                    None => {
                        if self.buffer.len() > self.max_frame_size {
                            return Err(LabwireError::FrameTooLarge {
                                max: self.max_frame_size,
                            });
                        }
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer and reset state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = State::SeekingStx;
    }

    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match self.state {
            State::SeekingStx => "SeekingStx",
            State::Collecting => "Collecting",
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

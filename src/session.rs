//! Session - one owned TCP connection to the collector.
//!
//! A [`Session`] drives a single connection sequentially: send, bounded wait,
//! send, bounded wait. Multiple instruments are simulated by running multiple
//! sessions as independent tasks; sessions never share connection state, and
//! the only shared resource is the read-only catalog.
//!
//! Lifecycle: `Disconnected -> Connecting -> Connected -> Closing ->
//! Disconnected`. Every wait is bounded by a configured timeout, so closing a
//! session is safe at any point and a silent collector never stalls anything
//! but its own session.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use labwire::{Catalog, Codec, LabResult, PatientId, Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> labwire::Result<()> {
//!     let codec = Codec::new(Arc::new(Catalog::builtin()));
//!     let mut session = Session::new(SessionConfig::new("192.168.0.3", 12377));
//!
//!     session.connect().await?;
//!     let reading = LabResult::new(
//!         PatientId::parse("PATIENT001")?,
//!         "GLUCOSE",
//!         120.0,
//!         "mg/dL",
//!     );
//!     let outcome = session.send_reading(&codec, &reading).await?;
//!     println!("collector said: {outcome:?}");
//!     session.close().await;
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::codec::{Codec, LabResult};
use crate::error::{LabwireError, Result};
use crate::probes::Probe;
use crate::protocol::{Frame, ACK, EOT, NAK};

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default per-response wait.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(3);

/// Default pause between sends in a probe sequence.
pub const DEFAULT_INTER_SEND_DELAY: Duration = Duration::from_millis(50);

/// Read buffer size for responses.
const RESPONSE_BUFFER_SIZE: usize = 1024;

/// Configuration for a session.
///
/// Builder-style setters; only host and port are required.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Collector hostname or address.
    pub host: String,
    /// Collector TCP port.
    pub port: u16,
    /// Upper bound on TCP connect.
    pub connect_timeout: Duration,
    /// Upper bound on each response wait.
    pub response_timeout: Duration,
    /// Pause between sends in a batch, giving the collector time to process.
    pub inter_send_delay: Duration,
}

impl SessionConfig {
    /// Create a config for the given collector endpoint with default timing.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            inter_send_delay: DEFAULT_INTER_SEND_DELAY,
        }
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the per-response wait.
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Set the pause between sends in a batch.
    pub fn inter_send_delay(mut self, delay: Duration) -> Self {
        self.inter_send_delay = delay;
        self
    }
}

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection; the only state from which `connect` is valid.
    Disconnected,
    /// TCP connect in flight.
    Connecting,
    /// Connection established; sends and waits are valid.
    Connected,
    /// EOT/shutdown in progress.
    Closing,
}

/// Result of one bounded response wait.
///
/// A timeout is a normal, reportable outcome - the contract tolerates a
/// collector that silently drops malformed frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Raw bytes received from the collector.
    Received(Bytes),
    /// No bytes within the deadline.
    TimedOut,
}

/// Collector's verdict on one reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingOutcome {
    /// Single ACK byte (0x06).
    Acked,
    /// Single NAK byte (0x15).
    Rejected,
    /// Any other byte sequence.
    Unexpected(Bytes),
    /// No response within the deadline.
    TimedOut,
}

/// Report for one probe in an adversarial sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Probe label, for audit output.
    pub label: &'static str,
    /// Exact bytes placed on the wire.
    pub sent: Bytes,
    /// What came back, or that nothing did.
    pub response: ResponseOutcome,
}

/// One owned TCP connection with explicit lifecycle state.
pub struct Session {
    config: SessionConfig,
    stream: Option<TcpStream>,
    state: SessionState,
}

impl Session {
    /// Create a disconnected session.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            stream: None,
            state: SessionState::Disconnected,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Connect to the collector.
    ///
    /// On refusal or timeout the session returns [`LabwireError::Connect`]
    /// and remains `Disconnected`. No automatic retry - the caller decides.
    pub async fn connect(&mut self) -> Result<()> {
        if self.state != SessionState::Disconnected {
            return Err(LabwireError::InvalidState {
                op: "connect",
                state: self.state,
            });
        }

        self.state = SessionState::Connecting;
        let addr = (self.config.host.as_str(), self.config.port);

        let connected = match timeout(self.config.connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(source)) => Err(source),
            Err(_) => Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "connect timed out",
            )),
        };

        match connected {
            Ok(stream) => {
                tracing::debug!(host = %self.config.host, port = self.config.port, "connected");
                self.stream = Some(stream);
                self.state = SessionState::Connected;
                Ok(())
            }
            Err(source) => {
                self.state = SessionState::Disconnected;
                Err(LabwireError::Connect {
                    host: self.config.host.clone(),
                    port: self.config.port,
                    source,
                })
            }
        }
    }

    /// Write a frame to the wire in full.
    ///
    /// Atomic from the caller's perspective (the transport may still fragment
    /// at the byte level). Does not wait for a reply.
    pub async fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send_raw(frame.as_bytes()).await
    }

    /// Write raw bytes to the wire in full.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self.connected_stream("send")?;
        stream.write_all(bytes).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Wait up to `deadline` for any response bytes.
    ///
    /// Timeout is a normal outcome, not an error. A zero-byte read (peer
    /// closed) is [`LabwireError::ConnectionClosed`].
    pub async fn await_response(&mut self, deadline: Duration) -> Result<ResponseOutcome> {
        let stream = self.connected_stream("await_response")?;
        let mut buf = [0u8; RESPONSE_BUFFER_SIZE];

        match timeout(deadline, stream.read(&mut buf)).await {
            Ok(Ok(0)) => Err(LabwireError::ConnectionClosed),
            Ok(Ok(n)) => Ok(ResponseOutcome::Received(Bytes::copy_from_slice(&buf[..n]))),
            Ok(Err(source)) => Err(LabwireError::Io(source)),
            Err(_) => Ok(ResponseOutcome::TimedOut),
        }
    }

    /// Close the session.
    ///
    /// Best-effort EOT send first - the socket may already be half-closed by
    /// the peer, so a write failure here is logged and swallowed. The state
    /// becomes `Disconnected` unconditionally; safe to call in any state,
    /// idempotent.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            self.state = SessionState::Closing;
            if let Err(error) = stream.write_all(&[EOT]).await {
                tracing::debug!(%error, "EOT send failed during close");
            }
            let _ = stream.shutdown().await;
            tracing::debug!(host = %self.config.host, port = self.config.port, "closed");
        }
        self.state = SessionState::Disconnected;
    }

    /// Send one reading and interpret the collector's acknowledgement.
    ///
    /// Non-ACK outcomes are reported, not fatal; the session stays usable for
    /// the next reading.
    pub async fn send_reading(&mut self, codec: &Codec, result: &LabResult) -> Result<ReadingOutcome> {
        let frame = codec.encode(result);
        self.send_frame(&frame).await?;

        let outcome = match self.await_response(self.config.response_timeout).await? {
            ResponseOutcome::TimedOut => ReadingOutcome::TimedOut,
            ResponseOutcome::Received(bytes) => match bytes.as_ref() {
                [ACK] => ReadingOutcome::Acked,
                [NAK] => ReadingOutcome::Rejected,
                _ => ReadingOutcome::Unexpected(bytes),
            },
        };
        tracing::debug!(
            patient = %result.patient_id,
            test = %result.test_name,
            ?outcome,
            "reading sent"
        );
        Ok(outcome)
    }

    /// Drive a probe sequence, best-effort and fully independent per frame.
    ///
    /// Each probe is sent, then awaited within the response timeout, then
    /// followed by the configured inter-send delay. A timeout on one probe
    /// never aborts the rest; every probe yields its own report, logged so a
    /// full adversarial run is auditable.
    pub async fn run_probes(&mut self, probes: &[Probe]) -> Result<Vec<ProbeReport>> {
        let mut reports = Vec::with_capacity(probes.len());

        for probe in probes {
            self.send_raw(&probe.bytes).await?;
            let response = self.await_response(self.config.response_timeout).await?;

            tracing::info!(
                label = probe.label,
                sent = probe.bytes.len(),
                ?response,
                "probe outcome"
            );
            reports.push(ProbeReport {
                label: probe.label,
                sent: probe.bytes.clone(),
                response,
            });

            tokio::time::sleep(self.config.inter_send_delay).await;
        }

        Ok(reports)
    }

    /// Get the stream, or an `InvalidState` error naming the operation.
    fn connected_stream(&mut self, op: &'static str) -> Result<&mut TcpStream> {
        match (&self.state, self.stream.as_mut()) {
            (SessionState::Connected, Some(stream)) => Ok(stream),
            _ => Err(LabwireError::InvalidState {
                op,
                state: self.state,
            }),
        }
    }
}

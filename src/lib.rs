//! # labwire
//!
//! Client SDK and codec for the framed TCP protocol laboratory instruments
//! use to report test results to a collector server.
//!
//! ## Architecture
//!
//! - **Codec** ([`Codec`]): encodes a [`LabResult`] into a delimited wire
//!   frame and classifies received frames against a [`Catalog`].
//! - **Session** ([`Session`]): owns one TCP connection and drives a
//!   sequence of sends with bounded response waits, for both realistic
//!   readings and adversarial probing.
//!
//! The collector server is an external collaborator; this crate implements
//! only the client side of the contract plus the stream reassembly
//! ([`protocol::FrameBuffer`]) a contract-conformant collector needs.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use labwire::{Catalog, Codec, LabResult, PatientId, Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> labwire::Result<()> {
//!     let codec = Codec::new(Arc::new(Catalog::builtin()));
//!     let mut session = Session::new(SessionConfig::new("192.168.0.3", 12377));
//!     session.connect().await?;
//!
//!     let reading = LabResult::new(
//!         PatientId::parse("PATIENT001")?,
//!         "GLUCOSE",
//!         120.0,
//!         "mg/dL",
//!     );
//!     println!("{:?}", session.send_reading(&codec, &reading).await?);
//!
//!     session.close().await;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod codec;
pub mod error;
pub mod probes;
pub mod protocol;
pub mod session;

pub use catalog::{Catalog, PatientId, TestDefinition};
pub use codec::{Codec, LabResult, ValidationOutcome};
pub use error::{LabwireError, Result};
pub use probes::{adversarial_probes, Probe};
pub use session::{
    ProbeReport, ReadingOutcome, ResponseOutcome, Session, SessionConfig, SessionState,
};

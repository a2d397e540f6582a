//! Remote font conversion for Nepali text.
//!
//! This crate is UI-free:
//! - It talks to the conversion service and classifies its replies.
//! - It drives one conversion session over any [`nepfont_model::TextHost`].
//! - Presenting menus and messages is left to the caller.

pub mod client;
pub mod protocol;
pub mod session;
pub mod toggle;
pub mod transport;

pub use nepfont_model::{ServiceSettings, DEFAULT_CLIENT_ID};

pub use client::{ConversionClient, ConversionOutcome, FailureReason};
pub use protocol::{ConversionRequest, ConversionResponse, MessageId};
pub use session::{
    FailureNotice, Orchestrator, Phase, RunReport, SessionError, SessionResult, LEGACY_RUN_MARKER,
};
pub use toggle::{ConversionToggle, ServiceUnavailable};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};

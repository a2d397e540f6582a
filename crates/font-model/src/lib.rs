//! Font identities, script detection and run segmentation for Nepali legacy
//! font conversion.
//!
//! This crate is network-free: everything here works on host-supplied text
//! units and produces values for the conversion layer to act on. Service
//! settings live here too, so persisting them never pulls in a transport.

pub mod edit;
pub mod host;
pub mod registry;
pub mod script;
pub mod segment;
pub mod selection;
pub mod settings;

pub use edit::{Edit, OffsetTracker};
pub use host::{Document, DocumentFile, ExcludedZone, HostError, StyledSpan, TextHost, Zone};
pub use registry::{
    FontEntry, FontKey, FontRegistry, RegistryError, UNICODE_KEY, UNICODE_LOCAL_NAME,
};
pub use script::{is_unicode_devanagari, ScriptClassifier, Strictness};
pub use segment::{segment, segment_selection, Run, Span, TextUnit};
pub use selection::{eligible_target_fonts, is_convertible_selection, selection_font};
pub use settings::{ServiceSettings, DEFAULT_CLIENT_ID};

//! Compatibility engine for the FX client
//!
//! Turns raw source payloads into a status and decides whether anything changed
//! since the last run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Extractor  │────▶│ Classifier  │     │  Snapshot   │
//! │ (text→pair) │     │  (status)   │     │ (reconcile) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │  Encodings  │     │  Formatter  │
//! │(orig,rebuilt│     │ (1.23.4)    │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`extractor`]: Pulls `{protocol, game}` out of vanilla and FX source text
//! - [`format`]: Renders version codes for humans
//! - [`classifier`]: Derives client and lobby status from extracted versions
//! - [`snapshot`]: Canonical snapshot form and change detection

pub mod classifier;
pub mod extractor;
pub mod format;
pub mod snapshot;

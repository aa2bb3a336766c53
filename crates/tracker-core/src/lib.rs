//! `tracker-core`: turns raw tracker work items into markdown and workflow
//! directives for AI assistants.
//!
//! ```text
//! RawRecord ──► format (fields) ─┐
//!           └─► richtext (description, comments) ─► record (ProjectedRecord → markdown)
//!                                                        │
//!                                                        ▼
//!                                                   directive ─► present
//! ```
//!
//! Everything on that path is pure and total. `client`, `config` and
//! `credentials` are the I/O around it.

pub mod client;
pub mod config;
pub mod credentials;
pub mod directive;
pub mod error;
pub mod format;
pub mod html;
pub mod io;
pub mod listing;
pub mod members;
pub mod paths;
pub mod present;
pub mod raw;
pub mod record;
pub mod richtext;
pub mod types;

pub use error::{Result, TrackerError};
pub use present::{present, Presentation};
pub use raw::RawRecord;

//! camlag - capture-stream timing toolkit
//!
//! This crate parses directories of sequentially captured `.jpg` pictures
//! into structured timing metadata and can synthesize a second, artificially
//! delayed copy of a stream by sampling a configurable delay distribution per
//! picture.
//!
//! # Pipeline
//!
//! 1. **Extract**: [`StreamMetadata::scan`] validates a whole stream
//!    directory fail-fast against the filename protocol and returns an
//!    ordered, immutable snapshot — or nothing at all.
//! 2. **Analyze**: [`timing`] offers pure statistics over the capture
//!    timestamps for external visualization tooling.
//! 3. **Plan**: [`SyntheticStreamMetadata::plan`] samples a [`DelayModel`]
//!    once per picture and builds the delayed copy entirely in memory.
//! 4. **Materialize**: the plan is written to disk at most once per target
//!    path; a `_SUCCESS` marker written last is the only completion signal.
//!
//! # Module Structure
//!
//! - `filename`: bit-exact filename protocol (decode/encode)
//! - `metadata`: directory scanning and homogeneity validation
//! - `timing`: inter-arrival and offset statistics
//! - `delay`: the closed set of stochastic delay models
//! - `synth`: planning and materializing delayed copies
//! - `error`: the error taxonomy shared by all of the above
//! - `config`: JSON-file/env defaults for the CLI tools

pub mod config;
pub mod delay;
pub mod error;
pub mod filename;
pub mod metadata;
pub mod synth;
pub mod timing;

pub use delay::DelayModel;
pub use error::StreamError;
pub use filename::{decode, encode, DecodedPicture};
pub use metadata::{PictureRecord, StreamIdentity, StreamMetadata};
pub use synth::{is_complete, SyntheticPictureRecord, SyntheticStreamMetadata, COMPLETION_MARKER};
pub use timing::{delay_from_first, duration_to_ms, inter_arrival_times};

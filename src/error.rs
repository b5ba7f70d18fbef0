//! # Error Types
//!
//! One crate-wide error enum, shaped around the client's user-facing
//! messages: each variant's display string is exactly what the surrounding
//! UI should show, and anything that is diagnostic-only (originating
//! pipeline stage, underlying engine error) rides along as structured data
//! for logging rather than leaking into the message.
//!
//! Nothing in this crate retries an error. Transport and pipeline errors are
//! surfaced once per user action; render errors never reach here at all;
//! rendering is best-effort and only logs.
//!
//! ## Usage
//! ```rust
//! use ceol::CeolError;
//!
//! fn notify(err: &CeolError) {
//!     match err {
//!         CeolError::RequestFailed { status } => {
//!             eprintln!("request failed with status {status}");
//!         }
//!         CeolError::MissingVariation { id } => {
//!             eprintln!("no {id} variation loaded");
//!         }
//!         other => eprintln!("{other}"),
//!     }
//! }
//! ```

use thiserror::Error;

use crate::engine::{EngineError, SynthError};
use crate::playback::PipelineStage;

#[derive(Error, Debug)]
pub enum CeolError {
    /// The generation service answered with a non-success status.
    ///
    /// # Example
    /// ```
    /// # use ceol::CeolError;
    /// let err = CeolError::RequestFailed { status: 502 };
    /// assert_eq!(err.to_string(), "request failed with status 502");
    /// ```
    #[error("request failed with status {status}")]
    RequestFailed { status: u16 },

    /// The request never completed: connection, timeout, or body decoding.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Playback was requested for a variation that is not loaded.
    #[error("no {id} variation loaded")]
    MissingVariation { id: String },

    /// The notation engine cannot synthesize audio in this environment.
    /// Terminal for the session; not retried.
    #[error("audio is not supported in this environment")]
    AudioUnsupported,

    /// The audio-only parse of the rewritten notation failed. Presented as a
    /// generic playback failure; the engine detail is for logs.
    #[error("playback failed")]
    Parse(#[source] EngineError),

    /// A synthesis pipeline stage failed. The stage is diagnostic detail
    /// only; the user sees a single generic message.
    #[error("playback failed")]
    Pipeline {
        stage: PipelineStage,
        #[source]
        source: SynthError,
    },
}

//! # Playback Module
//!
//! Orchestrates audio playback of tune variations.
//!
//! ## Purpose
//! Takes a named variation from the loaded [`VariationSet`], injects the
//! requested tempo into its notation, and drives the external synthesis
//! engine through the initialize → prime → start pipeline. Controller
//! lifecycle (creation, mutual exclusion, teardown) lives here and in the
//! registry; the synthesis itself is the engine's business.
//!
//! ## Sub-modules
//! - `types` - PlaybackState machine and PipelineStage definitions
//! - `engine` - the Player orchestrator
//!
//! ## Key Types
//! - [`Player`] - end-to-end playback orchestration for one engine
//! - [`PlaybackState`] - per-controller lifecycle state
//! - [`PipelineStage`] - which pipeline step failed, for diagnostics
//!
//! ## Ordering Guarantees
//! Only one variation may sound at a time: `play` fully stops prior audio
//! before any new audio starts. Each request constructs a fresh controller
//! (the engine cannot re-prime a used one) and runs the pipeline exactly
//! once, strictly in order. A controller superseded while its pipeline is in
//! flight is never started.
//!
//! [`VariationSet`]: crate::variation::VariationSet

mod engine;
mod types;


pub use engine::{PlaybackOptions, Player};
pub use types::{PipelineStage, PlaybackState};

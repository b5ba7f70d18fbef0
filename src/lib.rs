pub mod abc;
pub mod client;
pub mod engine;
pub mod error;
pub mod playback;
pub mod registry;
pub mod render;
pub mod variation;

pub use abc::set_tempo;
pub use client::{VariationClient, VariationClientBuilder, KNOWN_STYLES};
pub use engine::{
    EngineError, NotationEngine, RenderOptions, SynthController, SynthError, SynthOptions,
    WrapSpec, DEFAULT_PROGRAM,
};
pub use error::CeolError;
pub use playback::{PipelineStage, PlaybackOptions, PlaybackState, Player};
pub use registry::{ControllerRegistry, ControllerToken};
pub use render::{render, render_wrapped, DEFAULT_STAFF_WIDTH};
pub use variation::{GenerationResponse, VariationSet};

/// Default playback tempo in quarter-note beats per minute.
pub const DEFAULT_TEMPO: u32 = 120;

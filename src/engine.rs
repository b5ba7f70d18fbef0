//! # Notation Engine Interface
//!
//! The rendering/synthesis engine is an external capability: this crate
//! drives it but never implements it. The seam is two traits:
//!
//! - [`NotationEngine`] - parse notation text into a renderable tune object,
//!   draw notation into a named container, and construct synth controllers.
//! - [`SynthController`] - one synthesis session for one parsed tune, driven
//!   through the strictly ordered initialize → prime → start pipeline.
//!
//! ## Hard constraints of the capability
//! - A controller cannot be re-primed. Every playback request must construct
//!   a fresh controller; pooling or reuse is not an option.
//! - `stop` must be callable in any state, including on a controller whose
//!   pipeline never completed, and must never fail.

use async_trait::async_trait;
use thiserror::Error;

/// General MIDI program used for synthesis unless overridden. 73 is flute.
pub const DEFAULT_PROGRAM: u8 = 73;

/// Errors reported by the notation engine for parse and render operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The named container does not resolve to a live mount point.
    #[error("container `{0}` not found")]
    ContainerNotFound(String),

    /// The notation source could not be parsed.
    #[error("notation parse failed: {0}")]
    Parse(String),

    /// The engine failed while drawing into a container.
    #[error("render failed: {0}")]
    Render(String),
}

/// Failure of one synthesis pipeline stage, with the engine's own message.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct SynthError(pub String);

/// Options handed to [`SynthController::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthOptions {
    /// General MIDI program for the synthesized voice.
    pub program: u8,
    /// Quarter notes per minute.
    pub qpm: u32,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM,
            qpm: crate::DEFAULT_TEMPO,
        }
    }
}

/// Layout configuration for visual rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Re-layout when the container is resized.
    pub responsive: bool,
    /// Fixed staff width in pixels; the engine chooses when absent.
    pub staff_width: Option<f64>,
    /// Line wrapping configuration; no wrapping when absent.
    pub wrap: Option<WrapSpec>,
    /// Visual transposition in semitones. Audio pitch is unaffected.
    pub visual_transpose: i8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            staff_width: None,
            wrap: None,
            visual_transpose: 0,
        }
    }
}

/// Line wrapping thresholds for rendered notation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapSpec {
    pub min_spacing: f64,
    pub max_spacing: f64,
    pub preferred_measures_per_line: u32,
}

/// One synthesis session for one parsed tune.
///
/// The pipeline is strictly ordered: `prime` may only be called after `init`
/// resolves, `start` only after `prime` resolves. A controller runs the
/// pipeline at most once; it cannot be rewound or re-primed.
#[async_trait]
pub trait SynthController: Send {
    /// The engine's parsed tune representation.
    type Tune: Send;

    /// Load the parsed tune and prepare the synthesis graph.
    async fn init(&mut self, tune: Self::Tune, options: &SynthOptions) -> Result<(), SynthError>;

    /// Buffer audio so playback can begin without a gap.
    async fn prime(&mut self) -> Result<(), SynthError>;

    /// Begin audible playback.
    async fn start(&mut self) -> Result<(), SynthError>;

    /// Stop playback. Safe in any state; a controller with nothing to stop
    /// treats this as a no-op.
    fn stop(&mut self);
}

/// The external rendering/synthesis engine.
pub trait NotationEngine {
    /// Parsed, renderable form of one tune.
    type Tune: Send;
    /// The controller type this engine constructs.
    type Controller: SynthController<Tune = Self::Tune>;

    /// Whether audio synthesis is available in the current environment.
    fn supports_audio(&self) -> bool;

    /// Parse notation source for audio use only. Must not draw anything or
    /// produce any other visible side effect.
    fn parse(&mut self, source: &str) -> Result<Self::Tune, EngineError>;

    /// Construct a fresh, unused controller.
    fn create_controller(&mut self) -> Self::Controller;

    /// Draw notation into the named container.
    fn render(
        &mut self,
        container_id: &str,
        source: &str,
        options: &RenderOptions,
    ) -> Result<(), EngineError>;

    /// Live width in pixels of the named container's parent, when it can be
    /// measured at call time.
    fn parent_width(&self, container_id: &str) -> Option<f64>;
}

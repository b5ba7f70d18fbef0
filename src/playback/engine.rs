//! Playback orchestration.
//!
//! Drives one variation's playback request end-to-end: global stop, tempo
//! rewrite, audio-only parse, fresh controller construction and registration,
//! then the strictly ordered initialize → prime → start pipeline.

use tracing::{debug, error, info};

use crate::abc;
use crate::engine::{NotationEngine, SynthController, SynthError, SynthOptions, DEFAULT_PROGRAM};
use crate::error::CeolError;
use crate::registry::{ControllerRegistry, ControllerToken};
use crate::variation::VariationSet;

use super::types::{PipelineStage, PlaybackState};

/// Options applied to every playback request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackOptions {
    /// General MIDI program for the synthesized voice.
    pub program: u8,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM,
        }
    }
}

/// Orchestrates audio playback of loaded variations.
///
/// Owns the notation engine and the controller registry; only one variation
/// may sound at a time across the whole player, and every playback request
/// constructs a fresh controller (the engine cannot re-prime one).
pub struct Player<E: NotationEngine> {
    engine: E,
    registry: ControllerRegistry<E::Controller>,
    options: PlaybackOptions,
}

impl<E: NotationEngine> Player<E> {
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, PlaybackOptions::default())
    }

    pub fn with_options(engine: E, options: PlaybackOptions) -> Self {
        Self {
            engine,
            registry: ControllerRegistry::new(),
            options,
        }
    }

    /// The underlying notation engine, for rendering alongside playback.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Current state of the controller registered under `id`, if any.
    pub fn state(&self, id: &str) -> Option<PlaybackState> {
        self.registry.state(id)
    }

    /// Whether a controller is registered under `id`.
    pub fn is_registered(&self, id: &str) -> bool {
        self.registry.get(id).is_some()
    }

    /// Play one variation at the given tempo.
    ///
    /// Stops all current playback first: overlapping audio from two
    /// variations is never permitted. A lookup failure is reported before
    /// anything is stopped, so asking for an unloaded variation does not
    /// disturb whatever is currently playing.
    pub async fn play(
        &mut self,
        id: &str,
        variations: &VariationSet,
        tempo: u32,
    ) -> Result<(), CeolError> {
        info!(variation = %id, tempo, "playback requested");
        debug!(loaded = ?variations.ids().collect::<Vec<_>>(), "available variations");

        let source = match variations.get(id) {
            Some(source) => source,
            None => {
                error!(variation = %id, "variation not loaded");
                return Err(CeolError::MissingVariation { id: id.to_string() });
            }
        };

        self.stop_all();

        let source = abc::set_tempo(source, tempo);

        if !self.engine.supports_audio() {
            error!("audio not supported by the notation engine");
            return Err(CeolError::AudioUnsupported);
        }

        // Audio-only parse; nothing visible is re-rendered here.
        let tune = match self.engine.parse(&source) {
            Ok(tune) => tune,
            Err(e) => {
                error!(error = %e, "audio parse failed");
                return Err(CeolError::Parse(e));
            }
        };

        let controller = self.engine.create_controller();
        let (token, displaced) = self.registry.register(id, controller);
        if let Some(mut previous) = displaced {
            // A displaced controller is stopped before its successor runs.
            previous.stop();
        }
        debug!(variation = %id, "fresh synth controller registered");

        let options = SynthOptions {
            program: self.options.program,
            qpm: tempo,
        };

        self.registry
            .set_state(id, token, PlaybackState::Initializing);
        let init_result = match self.registry.controller_mut(id, token) {
            Some(controller) => controller.init(tune, &options).await,
            None => return Ok(()),
        };
        if let Err(e) = init_result {
            return Err(self.stage_failed(id, token, PipelineStage::Initialize, e));
        }
        debug!(variation = %id, "synth initialized, priming");

        let prime_result = match self.registry.controller_mut(id, token) {
            Some(controller) => controller.prime().await,
            None => return Ok(()),
        };
        if let Err(e) = prime_result {
            return Err(self.stage_failed(id, token, PipelineStage::Prime, e));
        }
        self.registry.set_state(id, token, PlaybackState::Primed);
        debug!(variation = %id, "synth primed, starting");

        // A stop or a newer play for the same id may have superseded this
        // controller while init/prime were in flight; a superseded controller
        // must never reach the audio device.
        let start_result = match self.registry.controller_mut(id, token) {
            Some(controller) => controller.start().await,
            None => {
                info!(variation = %id, "controller superseded before start, not starting");
                return Ok(());
            }
        };
        if let Err(e) = start_result {
            return Err(self.stage_failed(id, token, PipelineStage::Start, e));
        }
        self.registry.set_state(id, token, PlaybackState::Playing);
        info!(variation = %id, "playback started");
        Ok(())
    }

    /// Stop playback of one variation. Stopping something that is not
    /// playing is always safe and does nothing.
    pub fn stop(&mut self, id: &str) {
        match self.registry.remove(id) {
            Some(mut controller) => {
                info!(variation = %id, "stopping playback");
                controller.stop();
            }
            None => debug!(variation = %id, "stop requested for idle variation"),
        }
    }

    /// Stop every registered controller and clear the registry.
    pub fn stop_all(&mut self) {
        info!("stopping all playback");
        self.registry.stop_all();
    }

    fn stage_failed(
        &mut self,
        id: &str,
        token: ControllerToken,
        stage: PipelineStage,
        source: SynthError,
    ) -> CeolError {
        // The controller stays registered in whatever state it reached; a
        // later stop-all will still attempt to stop it.
        self.registry.set_state(id, token, PlaybackState::Failed);
        error!(variation = %id, %stage, error = %source, "pipeline stage failed");
        CeolError::Pipeline { stage, source }
    }
}

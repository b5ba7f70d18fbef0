//! Integration tests for the ceol playback client
//!
//! Drives the public API end-to-end with a scripted notation engine standing
//! in for the real rendering/synthesis capability.

use std::future::Future;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ceol::{
    set_tempo, CeolError, EngineError, NotationEngine, PlaybackState, Player, RenderOptions,
    SynthController, SynthError, SynthOptions, VariationSet,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Parsed(String),
    Started(usize),
    Stopped(usize),
}

type Log = Arc<Mutex<Vec<Event>>>;

struct Tune;

struct Controller {
    id: usize,
    log: Log,
}

#[async_trait]
impl SynthController for Controller {
    type Tune = Tune;

    async fn init(&mut self, _tune: Tune, _options: &SynthOptions) -> Result<(), SynthError> {
        Ok(())
    }

    async fn prime(&mut self) -> Result<(), SynthError> {
        Ok(())
    }

    async fn start(&mut self) -> Result<(), SynthError> {
        self.log.lock().unwrap().push(Event::Started(self.id));
        Ok(())
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().push(Event::Stopped(self.id));
    }
}

struct Engine {
    log: Log,
    next_id: usize,
}

impl Engine {
    fn new(log: &Log) -> Self {
        Self {
            log: Arc::clone(log),
            next_id: 0,
        }
    }
}

impl NotationEngine for Engine {
    type Tune = Tune;
    type Controller = Controller;

    fn supports_audio(&self) -> bool {
        true
    }

    fn parse(&mut self, source: &str) -> Result<Tune, EngineError> {
        self.log.lock().unwrap().push(Event::Parsed(source.to_string()));
        Ok(Tune)
    }

    fn create_controller(&mut self) -> Controller {
        let id = self.next_id;
        self.next_id += 1;
        Controller {
            id,
            log: Arc::clone(&self.log),
        }
    }

    fn render(
        &mut self,
        _container_id: &str,
        _source: &str,
        _options: &RenderOptions,
    ) -> Result<(), EngineError> {
        Ok(())
    }

    fn parent_width(&self, _container_id: &str) -> Option<f64> {
        None
    }
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
        .block_on(future)
}

fn loaded_variations() -> VariationSet {
    [
        ("melodic".to_string(), "X:1\nK:C\nabc".to_string()),
        ("original".to_string(), "X:1\nK:C\nQ:1/4=90\ndef".to_string()),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_auditioning_two_variations() {
    let log = Log::default();
    let mut player = Player::new(Engine::new(&log));
    let variations = loaded_variations();

    block_on(player.play("melodic", &variations, 120)).unwrap();
    block_on(player.play("original", &variations, 120)).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            Event::Parsed("X:1\nK:C\nQ:1/4=120\nabc".to_string()),
            Event::Started(0),
            Event::Stopped(0),
            Event::Parsed("X:1\nK:C\nQ:1/4=120\ndef".to_string()),
            Event::Started(1),
        ]
    );
    assert_eq!(player.state("original"), Some(PlaybackState::Playing));
    assert!(!player.is_registered("melodic"));
}

#[test]
fn test_missing_variation_leaves_audio_running() {
    let log = Log::default();
    let mut player = Player::new(Engine::new(&log));
    let variations = loaded_variations();

    block_on(player.play("original", &variations, 100)).unwrap();
    let err = block_on(player.play("reverse", &variations, 100)).unwrap_err();

    assert!(matches!(err, CeolError::MissingVariation { ref id } if id == "reverse"));
    assert_eq!(err.to_string(), "no reverse variation loaded");
    assert!(!log.lock().unwrap().contains(&Event::Stopped(0)));
    assert_eq!(player.state("original"), Some(PlaybackState::Playing));
}

#[test]
fn test_stop_all_then_nothing_registered() {
    let log = Log::default();
    let mut player = Player::new(Engine::new(&log));
    let variations = loaded_variations();

    block_on(player.play("melodic", &variations, 120)).unwrap();
    player.stop_all();

    assert!(!player.is_registered("melodic"));
    assert!(!player.is_registered("original"));
    assert!(log.lock().unwrap().contains(&Event::Stopped(0)));
}

#[test]
fn test_stop_without_playback_is_safe() {
    let log = Log::default();
    let mut player = Player::new(Engine::new(&log));

    player.stop("melodic");
    player.stop_all();

    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_set_tempo_inserts_exactly_one_directive() {
    let source = "X:1\nT:Out on the Ocean\nM:6/8\nK:G\ngag gab\nage edB";
    let result = set_tempo(source, 112);

    let tempo_lines: Vec<&str> = result.lines().filter(|l| l.starts_with("Q:")).collect();
    assert_eq!(tempo_lines, vec!["Q:1/4=112"]);

    // Every original line survives, in order.
    let original: Vec<&str> = source.lines().collect();
    let kept: Vec<&str> = result.lines().filter(|l| !l.starts_with("Q:")).collect();
    assert_eq!(kept, original);
}

#[test]
fn test_set_tempo_replacement_keeps_line_count() {
    let source = "X:1\nQ:1/4=60\nK:D\nfaf gfe";
    let result = set_tempo(source, 144);
    assert_eq!(result.lines().count(), source.lines().count());
    assert!(result.contains("Q:1/4=144"));
    assert!(!result.contains("Q:1/4=60"));
}

#[test]
fn test_set_tempo_idempotent() {
    let source = "X:1\nK:Ador\neAAB cdef";
    let once = set_tempo(source, 96);
    assert_eq!(set_tempo(&once, 96), once);
}

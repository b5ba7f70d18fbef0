//! # Controller Registry
//!
//! Owns the mapping from variation id to its live synth controller. At most
//! one controller is registered per id; registering a second one hands the
//! displaced predecessor back to the caller so it can be stopped before the
//! new controller becomes current. All controller state lives here; no
//! other component holds controller handles.

use std::collections::HashMap;

use tracing::debug;

use crate::engine::SynthController;
use crate::playback::PlaybackState;

/// Identifies one registration. Tokens are never reused; once an id is
/// re-registered, token-gated access through the old token stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerToken(u64);

struct Entry<C> {
    controller: C,
    state: PlaybackState,
    token: ControllerToken,
}

/// Registry of live synth controllers, keyed by variation id.
pub struct ControllerRegistry<C> {
    entries: HashMap<String, Entry<C>>,
    next_token: u64,
}

impl<C: SynthController> ControllerRegistry<C> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_token: 0,
        }
    }

    /// Register a fresh controller under `id` in the `Created` state.
    ///
    /// Returns the registration token and, when `id` was already occupied,
    /// the displaced controller. The caller must stop the displaced
    /// controller; the registry does not touch it again.
    pub fn register(&mut self, id: &str, controller: C) -> (ControllerToken, Option<C>) {
        let token = ControllerToken(self.next_token);
        self.next_token += 1;

        let displaced = self
            .entries
            .insert(
                id.to_string(),
                Entry {
                    controller,
                    state: PlaybackState::Created,
                    token,
                },
            )
            .map(|entry| entry.controller);
        if displaced.is_some() {
            debug!(variation = %id, "registration displaced a live controller");
        }
        (token, displaced)
    }

    pub fn get(&self, id: &str) -> Option<&C> {
        self.entries.get(id).map(|entry| &entry.controller)
    }

    pub fn state(&self, id: &str) -> Option<PlaybackState> {
        self.entries.get(id).map(|entry| entry.state)
    }

    /// Mutable access to the controller registered under `id`, but only while
    /// `token` is still its current registration. A superseded pipeline gets
    /// `None` and must not drive audio.
    pub fn controller_mut(&mut self, id: &str, token: ControllerToken) -> Option<&mut C> {
        self.entries
            .get_mut(id)
            .filter(|entry| entry.token == token)
            .map(|entry| &mut entry.controller)
    }

    /// Advance the state of the registration identified by `token`. Stale
    /// tokens are ignored.
    pub fn set_state(&mut self, id: &str, token: ControllerToken, state: PlaybackState) {
        if let Some(entry) = self
            .entries
            .get_mut(id)
            .filter(|entry| entry.token == token)
        {
            entry.state = state;
        }
    }

    /// Remove and return the controller for `id`, if one is registered.
    pub fn remove(&mut self, id: &str) -> Option<C> {
        self.entries.remove(id).map(|entry| entry.controller)
    }

    /// Stop every registered controller and clear the registry.
    ///
    /// Controllers are independent resources; stop order across ids is
    /// unspecified. `SynthController::stop` is a no-op on controllers with
    /// nothing to stop, so partially initialized entries are tolerated.
    pub fn stop_all(&mut self) {
        for (id, mut entry) in self.entries.drain() {
            debug!(variation = %id, "stopping controller");
            entry.controller.stop();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: SynthController> Default for ControllerRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::engine::{SynthError, SynthOptions};

    struct TestController {
        id: usize,
        stopped: Arc<Mutex<Vec<usize>>>,
    }

    #[async_trait]
    impl SynthController for TestController {
        type Tune = ();

        async fn init(&mut self, _tune: (), _options: &SynthOptions) -> Result<(), SynthError> {
            Ok(())
        }

        async fn prime(&mut self) -> Result<(), SynthError> {
            Ok(())
        }

        async fn start(&mut self) -> Result<(), SynthError> {
            Ok(())
        }

        fn stop(&mut self) {
            self.stopped.lock().unwrap().push(self.id);
        }
    }

    fn controller(id: usize, stopped: &Arc<Mutex<Vec<usize>>>) -> TestController {
        TestController {
            id,
            stopped: Arc::clone(stopped),
        }
    }

    #[test]
    fn test_register_displaces_previous() {
        let stopped = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ControllerRegistry::new();

        let (first_token, displaced) = registry.register("melodic", controller(0, &stopped));
        assert!(displaced.is_none());

        let (second_token, displaced) = registry.register("melodic", controller(1, &stopped));
        let mut previous = displaced.expect("first controller displaced");
        previous.stop();

        assert_eq!(*stopped.lock().unwrap(), vec![0]);
        assert_ne!(first_token, second_token);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_stale_token_stops_resolving() {
        let stopped = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ControllerRegistry::new();

        let (old_token, _) = registry.register("melodic", controller(0, &stopped));
        let (new_token, _) = registry.register("melodic", controller(1, &stopped));

        assert!(registry.controller_mut("melodic", old_token).is_none());
        assert!(registry.controller_mut("melodic", new_token).is_some());

        registry.set_state("melodic", old_token, PlaybackState::Playing);
        assert_eq!(registry.state("melodic"), Some(PlaybackState::Created));
    }

    #[test]
    fn test_stop_all_stops_everything_and_clears() {
        let stopped = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ControllerRegistry::new();
        registry.register("original", controller(0, &stopped));
        registry.register("melodic", controller(1, &stopped));

        registry.stop_all();

        let mut ids = stopped.lock().unwrap().clone();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1]);
        assert!(registry.is_empty());
        assert!(registry.get("original").is_none());
        assert!(registry.get("melodic").is_none());
    }

    #[test]
    fn test_remove_absent_is_none() {
        let mut registry = ControllerRegistry::<TestController>::new();
        assert!(registry.remove("nope").is_none());
    }
}

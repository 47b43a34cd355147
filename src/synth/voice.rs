use super::key::KeyId;
use crate::audio::AudioEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Attacking,
    Sustained,
    Releasing,
    Stopped,
}

/// One sounding note: a tone generator and the gain stage that shapes it.
///
/// The voice exclusively owns both handles; dropping the voice releases them.
#[derive(Debug)]
pub struct Voice<T, G> {
    pub key: KeyId,
    pub frequency: f64,
    pub created_at: f64,
    pub tone: T,
    pub gain: G,
    state: EnvelopeState,
    attack_end: f64,
    stop_at: Option<f64>,
}

/// The voice type produced for a given engine.
pub type EngineVoice<E> = Voice<<E as AudioEngine>::Tone, <E as AudioEngine>::Gain>;

impl<T, G> Voice<T, G> {
    pub fn new(key: KeyId, frequency: f64, created_at: f64, attack: f64, tone: T, gain: G) -> Self {
        Self {
            key,
            frequency,
            created_at,
            tone,
            gain,
            state: EnvelopeState::Attacking,
            attack_end: created_at + attack,
            stop_at: None,
        }
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Advances the state to match the engine clock.
    pub fn refresh(&mut self, now: f64) -> EnvelopeState {
        self.state = match (self.state, self.stop_at) {
            (EnvelopeState::Attacking, _) if now >= self.attack_end => EnvelopeState::Sustained,
            (EnvelopeState::Releasing, Some(stop_at)) if now >= stop_at => EnvelopeState::Stopped,
            (state, _) => state,
        };
        self.state
    }

    pub(crate) fn mark_releasing(&mut self, stop_at: f64) {
        self.state = EnvelopeState::Releasing;
        self.stop_at = Some(stop_at);
    }

    pub(crate) fn mark_stopped(&mut self, at: f64) {
        self.state = EnvelopeState::Stopped;
        self.stop_at = Some(at);
    }
}

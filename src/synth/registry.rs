use super::key::KeyId;
use super::prelude::HashMap;
use super::voice::Voice;

/// Voices whose keys are currently held, at most one per key.
///
/// Every entry is a voice that has not been released; released voices leave
/// the registry immediately even though their tails keep sounding.
#[derive(Debug)]
pub struct VoiceRegistry<T, G> {
    voices: HashMap<KeyId, Voice<T, G>>,
}

impl<T, G> VoiceRegistry<T, G> {
    pub fn new() -> Self {
        Self {
            voices: HashMap::new(),
        }
    }

    pub fn has(&self, key: KeyId) -> bool {
        self.voices.contains_key(&key)
    }

    /// Records `voice` under its key. A key that is already sounding keeps
    /// its voice and the new one is handed back.
    pub fn insert(&mut self, voice: Voice<T, G>) -> Result<(), Voice<T, G>> {
        if self.has(voice.key) {
            return Err(voice);
        }
        self.voices.insert(voice.key, voice);
        Ok(())
    }

    pub fn remove(&mut self, key: KeyId) -> Option<Voice<T, G>> {
        self.voices.remove(&key)
    }

    pub fn get(&self, key: KeyId) -> Option<&Voice<T, G>> {
        self.voices.get(&key)
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.voices.keys().copied()
    }

    /// Moves held voices from attack to sustain as the clock passes.
    pub fn refresh(&mut self, now: f64) {
        for voice in self.voices.values_mut() {
            voice.refresh(now);
        }
    }
}

impl<T, G> Default for VoiceRegistry<T, G> {
    fn default() -> Self {
        Self::new()
    }
}

use super::error::SynthError;
use super::key::KeyId;
use super::voice::{EngineVoice, Voice};
use super::voice_config::EnvelopeConfig;
use super::waveform::Waveform;
use crate::audio::{AudioEngine, EngineState, GainControl, ToneGenerator};

/// Creates voices with an attack ramp and schedules their release against
/// the engine clock.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeScheduler {
    config: EnvelopeConfig,
}

impl EnvelopeScheduler {
    pub fn new(config: EnvelopeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    /// Builds a started voice for `key` routed into `master`.
    ///
    /// A suspended engine is resumed first so the first note of a session
    /// is not lost. The attack is linear from silence to the peak level,
    /// anchored at the engine's present time.
    pub fn start_voice<E: AudioEngine>(
        &self,
        engine: &mut E,
        master: &E::Gain,
        key: KeyId,
        frequency: f64,
        waveform: Waveform,
    ) -> Result<EngineVoice<E>, SynthError> {
        if engine.state() == EngineState::Suspended {
            log::debug!("Resuming suspended audio engine");
            engine.resume()?;
        }

        let now = engine.current_time();

        let mut tone = engine.create_tone_generator()?;
        tone.set_frequency(frequency, now)?;
        tone.set_waveform(waveform)?;

        let mut gain = engine.create_gain_control()?;
        engine.connect_tone(&tone, &gain)?;
        engine.connect_gain(&gain, master)?;

        gain.set_value_at_time(0.0, now)?;
        gain.linear_ramp_to_value_at_time(self.config.peak, now + self.config.attack)?;

        tone.start()?;

        Ok(Voice::new(
            key,
            frequency,
            now,
            self.config.attack,
            tone,
            gain,
        ))
    }

    /// Fades `voice` out and schedules its tone to stop once the fade is done.
    ///
    /// Every step uses a single clock read: pending ramps are cancelled, the
    /// gain is pinned to its present level, then it decays exponentially to
    /// the release floor. If any step fails the voice is silenced at once
    /// before the error is returned, so it never keeps sounding unstopped.
    pub fn release<E: AudioEngine>(
        &self,
        engine: &E,
        voice: &mut EngineVoice<E>,
    ) -> Result<f64, SynthError> {
        let now = engine.current_time();
        let stop_at = now + self.config.tail_length();

        if let Err(e) = self.schedule_release(voice, now, stop_at) {
            log::warn!("Release of key {} failed, stopping it now: {}", voice.key, e);
            if let Err(stop_err) = silence(voice, now) {
                log::error!("Could not stop key {}: {}", voice.key, stop_err);
            }
            return Err(e);
        }

        voice.mark_releasing(stop_at);
        Ok(stop_at)
    }

    /// Silences `voice` at once, cutting any release still in progress.
    pub fn force_stop<E: AudioEngine>(
        &self,
        engine: &E,
        voice: &mut EngineVoice<E>,
    ) -> Result<(), SynthError> {
        silence(voice, engine.current_time())
    }

    fn schedule_release<T: ToneGenerator, G: GainControl>(
        &self,
        voice: &mut Voice<T, G>,
        now: f64,
        stop_at: f64,
    ) -> Result<(), SynthError> {
        let present = voice.gain.value();

        voice.gain.cancel_scheduled_values(now)?;
        voice.gain.set_value_at_time(present, now)?;
        voice.gain.exponential_ramp_to_value_at_time(
            self.config.release_floor,
            now + self.config.release,
        )?;
        voice.tone.stop(stop_at)
    }
}

/// Drops the gain to zero and stops the tone at `now`. The tone is stopped
/// even when the gain cannot be changed.
fn silence<T: ToneGenerator, G: GainControl>(
    voice: &mut Voice<T, G>,
    now: f64,
) -> Result<(), SynthError> {
    let muted = voice
        .gain
        .cancel_scheduled_values(now)
        .and_then(|_| voice.gain.set_value_at_time(0.0, now));
    let stopped = voice.tone.stop(now);
    voice.mark_stopped(now);
    muted.and(stopped)
}

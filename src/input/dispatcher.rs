use crate::audio::{AudioEngine, GainControl};
use crate::synth::color::{ColorRange, Rgb, SurfaceColors};
use crate::synth::config::{RetriggerPolicy, SynthConfig};
use crate::synth::envelope::EnvelopeScheduler;
use crate::synth::error::SynthError;
use crate::synth::key::{KeyEvent, KeyId};
use crate::synth::pitch::PitchTable;
use crate::synth::registry::VoiceRegistry;
use crate::synth::voice::{EngineVoice, EnvelopeState};
use crate::synth::waveform::{CycleDirection, Waveform};

/// UI controls read at the moment a voice is created.
pub trait Controls {
    fn waveform(&self) -> Result<Waveform, SynthError>;
    /// Start and end colors of the pitch gradient.
    fn color_endpoints(&self) -> Result<(Rgb, Rgb), SynthError>;
}

/// Where the pitch color is shown.
pub trait Surface {
    fn apply(&mut self, colors: SurfaceColors) -> Result<(), SynthError>;
}

/// Controls held in memory, for hosts without form elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticControls {
    pub waveform: Waveform,
    pub start_color: Rgb,
    pub end_color: Rgb,
}

impl StaticControls {
    pub fn from_config(config: &SynthConfig) -> Self {
        Self {
            waveform: config.waveform,
            start_color: config.start_color,
            end_color: config.end_color,
        }
    }

    pub fn cycle_waveform(&mut self, direction: CycleDirection) {
        self.waveform = self.waveform.cycle(direction);
    }
}

impl Controls for StaticControls {
    fn waveform(&self) -> Result<Waveform, SynthError> {
        Ok(self.waveform)
    }

    fn color_endpoints(&self) -> Result<(Rgb, Rgb), SynthError> {
        Ok((self.start_color, self.end_color))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The key has no pitch.
    Unmapped,
    /// Key-down for a key that is already sounding, usually OS key repeat.
    AlreadySounding,
    /// Key-up for a key with no sounding voice.
    NotSounding,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    Started {
        frequency: f64,
        colors: SurfaceColors,
    },
    Released {
        stop_at: f64,
    },
    Ignored(IgnoreReason),
}

/// Turns key transitions into voice starts and releases.
///
/// Each key is either idle or sounding. Key-down on an idle mapped key
/// starts a voice; key-up on a sounding key releases it. Everything else is
/// ignored. All calls must come from one thread, one at a time.
pub struct InputDispatcher<E: AudioEngine> {
    engine: E,
    master: E::Gain,
    pitch_table: PitchTable,
    scheduler: EnvelopeScheduler,
    registry: VoiceRegistry<E::Tone, E::Gain>,
    /// Released voices whose tone has not been stopped yet.
    tails: Vec<EngineVoice<E>>,
    retrigger: RetriggerPolicy,
    domain: (f64, f64),
}

impl<E: AudioEngine> InputDispatcher<E> {
    pub fn new(engine: E, config: &SynthConfig) -> Result<Self, SynthError> {
        Self::with_pitch_table(engine, config, PitchTable::standard().clone())
    }

    /// Takes ownership of `engine` and wires the master gain to its output.
    pub fn with_pitch_table(
        mut engine: E,
        config: &SynthConfig,
        pitch_table: PitchTable,
    ) -> Result<Self, SynthError> {
        config.validate()?;

        let mut master = engine.create_gain_control()?;
        master.set_value_at_time(config.master_gain, engine.current_time())?;
        engine.connect_to_output(&master)?;

        let domain = config.domain_for(&pitch_table);
        log::info!(
            "Keyboard ready: {} keys, {:.2}-{:.2} Hz, master gain {}",
            pitch_table.len(),
            domain.0,
            domain.1,
            config.master_gain
        );

        Ok(Self {
            engine,
            master,
            pitch_table,
            scheduler: EnvelopeScheduler::new(config.envelope.clone()),
            registry: VoiceRegistry::new(),
            tails: Vec::new(),
            retrigger: config.retrigger,
            domain,
        })
    }

    pub fn dispatch<C, S>(
        &mut self,
        event: KeyEvent,
        controls: &C,
        surface: &mut S,
    ) -> Result<KeyOutcome, SynthError>
    where
        C: Controls + ?Sized,
        S: Surface + ?Sized,
    {
        if event.pressed {
            self.handle_key_down(event.key, controls, surface)
        } else {
            self.handle_key_up(event.key)
        }
    }

    pub fn handle_key_down<C, S>(
        &mut self,
        key: KeyId,
        controls: &C,
        surface: &mut S,
    ) -> Result<KeyOutcome, SynthError>
    where
        C: Controls + ?Sized,
        S: Surface + ?Sized,
    {
        self.collect_finished();

        let Some(note) = self.pitch_table.note(key) else {
            log::debug!("Key {key} is not mapped, ignoring");
            return Ok(KeyOutcome::Ignored(IgnoreReason::Unmapped));
        };
        let frequency = note.frequency;
        let name = note.name.clone();

        if self.registry.has(key) {
            log::debug!("Key {key} already sounding, ignoring repeat");
            return Ok(KeyOutcome::Ignored(IgnoreReason::AlreadySounding));
        }

        // Read the UI before touching the engine so a bad control value
        // cannot leave a started voice behind.
        let waveform = controls.waveform()?;
        let (low, high) = controls.color_endpoints()?;
        let colors = ColorRange::new(low, high, self.domain.0, self.domain.1).colors_for(frequency);

        if self.retrigger == RetriggerPolicy::CutTail {
            self.cut_tails(key)?;
        }

        let voice = self.scheduler.start_voice(
            &mut self.engine,
            &self.master,
            key,
            frequency,
            waveform,
        )?;
        if let Err(mut rejected) = self.registry.insert(voice) {
            self.scheduler.force_stop(&self.engine, &mut rejected)?;
            return Ok(KeyOutcome::Ignored(IgnoreReason::AlreadySounding));
        }

        log::info!(
            "Key {key} pressed - {name} at {frequency:.2} Hz ({waveform}), color {}",
            colors.background
        );
        surface.apply(colors)?;

        Ok(KeyOutcome::Started { frequency, colors })
    }

    pub fn handle_key_up(&mut self, key: KeyId) -> Result<KeyOutcome, SynthError> {
        self.collect_finished();

        let Some(mut voice) = self.registry.remove(key) else {
            log::debug!("Key {key} released with no sounding voice, ignoring");
            return Ok(KeyOutcome::Ignored(IgnoreReason::NotSounding));
        };

        let stop_at = self.scheduler.release(&self.engine, &mut voice)?;
        log::info!("Key {key} released - stopping at {stop_at:.3}s");
        self.tails.push(voice);

        Ok(KeyOutcome::Released { stop_at })
    }

    /// Releases every held key, e.g. when the host loses keyboard focus.
    pub fn release_all(&mut self) -> Result<usize, SynthError> {
        let keys: Vec<KeyId> = self.registry.keys().collect();
        for key in &keys {
            self.handle_key_up(*key)?;
        }
        Ok(keys.len())
    }

    pub fn is_sounding(&self, key: KeyId) -> bool {
        self.registry.has(key)
    }

    pub fn registry(&self) -> &VoiceRegistry<E::Tone, E::Gain> {
        &self.registry
    }

    /// Number of released voices still fading out.
    pub fn pending_tails(&self) -> usize {
        self.tails.len()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Drops released voices whose stop time has passed, which releases
    /// their engine handles.
    fn collect_finished(&mut self) {
        let now = self.engine.current_time();
        self.registry.refresh(now);
        self.tails
            .retain_mut(|voice| voice.refresh(now) != EnvelopeState::Stopped);
    }

    fn cut_tails(&mut self, key: KeyId) -> Result<(), SynthError> {
        let mut index = 0;
        while index < self.tails.len() {
            if self.tails[index].key == key {
                let mut tail = self.tails.swap_remove(index);
                log::debug!("Cutting release tail of key {key}");
                self.scheduler.force_stop(&self.engine, &mut tail)?;
            } else {
                index += 1;
            }
        }
        Ok(())
    }
}

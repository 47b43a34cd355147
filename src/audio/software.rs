use super::automation::Automation;
use super::cpal_backend::CpalBackend;
use super::{AudioEngine, EngineState, GainControl, ToneGenerator};
use crate::synth::error::SynthError;
use crate::synth::prelude::HashMap;
use crate::synth::waveform::Waveform;
use std::f64::consts::TAU;
use std::sync::{Arc, Mutex, MutexGuard};

/// Longest gain chain followed when mixing; deeper routes are treated as silent.
const MAX_ROUTE_DEPTH: usize = 8;

type NodeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Gain(NodeId),
    Output,
}

#[derive(Debug)]
struct ToneSlot {
    waveform: Waveform,
    frequency: Automation,
    phase: f64,
    gain: Option<NodeId>,
    started: bool,
    stop_at: Option<f64>,
    released: bool,
}

#[derive(Debug)]
struct GainSlot {
    level: Automation,
    route: Option<Route>,
    released: bool,
}

/// Node graph and clock shared between the engine handles and the audio
/// callback.
#[derive(Debug)]
pub struct Mixer {
    sample_rate: f64,
    frames: u64,
    running: bool,
    next_id: NodeId,
    tones: HashMap<NodeId, ToneSlot>,
    gains: HashMap<NodeId, GainSlot>,
}

impl Mixer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate: f64::from(sample_rate.max(1.0)),
            frames: 0,
            running: false,
            next_id: 0,
            tones: HashMap::new(),
            gains: HashMap::new(),
        }
    }

    pub fn now(&self) -> f64 {
        self.frames as f64 / self.sample_rate
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        // Keep the clock continuous across a rate change.
        let now = self.now();
        self.sample_rate = f64::from(sample_rate.max(1.0));
        self.frames = (now * self.sample_rate).round() as u64;
    }

    pub fn tone_count(&self) -> usize {
        self.tones.len()
    }

    pub fn gain_count(&self) -> usize {
        self.gains.len()
    }

    /// Renders one mono buffer and advances the clock. A suspended mixer
    /// outputs silence and keeps its clock still.
    pub fn render(&mut self, output: &mut [f32]) {
        output.fill(0.0);
        if !self.running {
            return;
        }

        let block_start = self.now();
        for gain in self.gains.values_mut() {
            gain.level.prune_before(block_start);
        }

        let Mixer {
            sample_rate,
            frames,
            tones,
            gains,
            ..
        } = self;

        for (offset, sample) in output.iter_mut().enumerate() {
            let time = (*frames + offset as u64) as f64 / *sample_rate;
            let mut mixed = 0.0f32;
            for tone in tones.values_mut() {
                if !tone.started || tone.stop_at.is_some_and(|stop| time >= stop) {
                    continue;
                }
                let frequency = f64::from(tone.frequency.value_at(time));
                tone.phase = (tone.phase + TAU * frequency / *sample_rate) % TAU;
                let Some(gain_id) = tone.gain else {
                    continue;
                };
                let level = route_level(gains, gain_id, time);
                if level != 0.0 {
                    mixed += tone.waveform.evaluate(tone.phase as f32) * level;
                }
            }
            *sample = mixed;
        }
        *frames += output.len() as u64;

        self.collect_garbage();
    }

    fn collect_garbage(&mut self) {
        let now = self.now();
        self.tones.retain(|_, tone| {
            let stopped = tone.stop_at.is_some_and(|stop| now >= stop);
            !(stopped || (tone.released && !tone.started))
        });

        let gains = &self.gains;
        let tones = &self.tones;
        let orphaned: Vec<NodeId> = gains
            .iter()
            .filter(|(id, gain)| {
                gain.released
                    && !tones.values().any(|tone| tone.gain == Some(**id))
                    && !gains
                        .values()
                        .any(|other| other.route == Some(Route::Gain(**id)))
            })
            .map(|(id, _)| *id)
            .collect();
        for id in orphaned {
            self.gains.remove(&id);
        }
    }

    fn allocate_id(&mut self) -> NodeId {
        self.next_id += 1;
        self.next_id
    }

    fn tone_mut(&mut self, id: NodeId) -> Result<&mut ToneSlot, SynthError> {
        self.tones
            .get_mut(&id)
            .ok_or_else(|| SynthError::Engine(format!("tone {id} no longer exists")))
    }

    fn gain_mut(&mut self, id: NodeId) -> Result<&mut GainSlot, SynthError> {
        self.gains
            .get_mut(&id)
            .ok_or_else(|| SynthError::Engine(format!("gain {id} no longer exists")))
    }
}

fn route_level(gains: &HashMap<NodeId, GainSlot>, first: NodeId, time: f64) -> f32 {
    let mut level = 1.0f32;
    let mut id = first;
    for _ in 0..MAX_ROUTE_DEPTH {
        let Some(gain) = gains.get(&id) else {
            return 0.0;
        };
        level *= gain.level.value_at(time);
        match gain.route {
            Some(Route::Output) => return level,
            Some(Route::Gain(next)) => id = next,
            None => return 0.0,
        }
    }
    0.0
}

fn lock(mixer: &Mutex<Mixer>) -> Result<MutexGuard<'_, Mixer>, SynthError> {
    mixer
        .lock()
        .map_err(|_| SynthError::Engine("mixer lock poisoned".to_string()))
}

#[derive(Debug)]
pub struct SoftwareTone {
    id: NodeId,
    mixer: Arc<Mutex<Mixer>>,
}

impl ToneGenerator for SoftwareTone {
    fn set_frequency(&mut self, hz: f64, time: f64) -> Result<(), SynthError> {
        let mut mixer = lock(&self.mixer)?;
        mixer
            .tone_mut(self.id)?
            .frequency
            .set_value_at_time(hz as f32, time)
    }

    fn set_waveform(&mut self, waveform: Waveform) -> Result<(), SynthError> {
        lock(&self.mixer)?.tone_mut(self.id)?.waveform = waveform;
        Ok(())
    }

    fn start(&mut self) -> Result<(), SynthError> {
        lock(&self.mixer)?.tone_mut(self.id)?.started = true;
        Ok(())
    }

    fn stop(&mut self, time: f64) -> Result<(), SynthError> {
        let mut mixer = lock(&self.mixer)?;
        // A tone already collected has stopped; nothing left to schedule.
        if let Ok(tone) = mixer.tone_mut(self.id) {
            tone.stop_at = Some(time);
        }
        Ok(())
    }
}

impl Drop for SoftwareTone {
    fn drop(&mut self) {
        if let Ok(mut mixer) = self.mixer.lock() {
            let now = mixer.now();
            if let Some(tone) = mixer.tones.get_mut(&self.id) {
                tone.released = true;
                // Nothing can schedule a stop any more.
                if tone.started && tone.stop_at.is_none() {
                    tone.stop_at = Some(now);
                }
            }
        }
    }
}

#[derive(Debug)]
pub struct SoftwareGain {
    id: NodeId,
    mixer: Arc<Mutex<Mixer>>,
}

impl SoftwareGain {
    fn with_level<R>(
        &mut self,
        f: impl FnOnce(&mut Automation) -> Result<R, SynthError>,
    ) -> Result<R, SynthError> {
        let mut mixer = lock(&self.mixer)?;
        f(&mut mixer.gain_mut(self.id)?.level)
    }
}

impl GainControl for SoftwareGain {
    fn value(&self) -> f32 {
        match self.mixer.lock() {
            Ok(mixer) => {
                let now = mixer.now();
                mixer
                    .gains
                    .get(&self.id)
                    .map_or(0.0, |gain| gain.level.value_at(now))
            }
            Err(_) => 0.0,
        }
    }

    fn set_value_at_time(&mut self, value: f32, time: f64) -> Result<(), SynthError> {
        self.with_level(|level| level.set_value_at_time(value, time))
    }

    fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> Result<(), SynthError> {
        self.with_level(|level| level.linear_ramp_to_value_at_time(value, time))
    }

    fn exponential_ramp_to_value_at_time(
        &mut self,
        value: f32,
        time: f64,
    ) -> Result<(), SynthError> {
        self.with_level(|level| level.exponential_ramp_to_value_at_time(value, time))
    }

    fn cancel_scheduled_values(&mut self, time: f64) -> Result<(), SynthError> {
        self.with_level(|level| {
            level.cancel_scheduled_values(time);
            Ok(())
        })
    }
}

impl Drop for SoftwareGain {
    fn drop(&mut self) {
        if let Ok(mut mixer) = self.mixer.lock() {
            if let Some(gain) = mixer.gains.get_mut(&self.id) {
                gain.released = true;
            }
        }
    }
}

/// A small Web Audio style engine rendered in software.
///
/// Without an output device the engine is driven by calling [`render`],
/// which is how the tests exercise it; with one, the `cpal` callback renders
/// the shared mixer.
///
/// [`render`]: SoftwareEngine::render
pub struct SoftwareEngine {
    mixer: Arc<Mutex<Mixer>>,
    backend: Option<CpalBackend>,
}

impl SoftwareEngine {
    /// An engine with no output device, starting suspended.
    pub fn offline(sample_rate: f32) -> Self {
        Self {
            mixer: Arc::new(Mutex::new(Mixer::new(sample_rate))),
            backend: None,
        }
    }

    /// An engine playing through an output device; `device` names a
    /// preferred device. Audio starts on the first `resume`.
    pub fn with_output(device: Option<&str>) -> Result<Self, SynthError> {
        let mixer = Arc::new(Mutex::new(Mixer::new(44_100.0)));
        let backend = CpalBackend::new(mixer.clone(), device)?;
        Ok(Self {
            mixer,
            backend: Some(backend),
        })
    }

    pub fn render(&mut self, output: &mut [f32]) -> Result<(), SynthError> {
        lock(&self.mixer)?.render(output);
        Ok(())
    }

    pub fn sample_rate(&self) -> f32 {
        self.mixer
            .lock()
            .map_or(0.0, |mixer| mixer.sample_rate as f32)
    }

    /// Live tone generators, including released ones still fading out.
    pub fn active_tones(&self) -> usize {
        self.mixer.lock().map_or(0, |mixer| mixer.tone_count())
    }

    pub fn active_gains(&self) -> usize {
        self.mixer.lock().map_or(0, |mixer| mixer.gain_count())
    }

    pub fn suspend(&mut self) -> Result<(), SynthError> {
        if let Some(backend) = self.backend.as_mut() {
            backend.stop()?;
        }
        lock(&self.mixer)?.running = false;
        Ok(())
    }
}

impl AudioEngine for SoftwareEngine {
    type Tone = SoftwareTone;
    type Gain = SoftwareGain;

    fn current_time(&self) -> f64 {
        self.mixer.lock().map_or(0.0, |mixer| mixer.now())
    }

    fn state(&self) -> EngineState {
        match self.mixer.lock() {
            Ok(mixer) if mixer.running => EngineState::Running,
            Ok(_) => EngineState::Suspended,
            Err(_) => EngineState::Closed,
        }
    }

    fn resume(&mut self) -> Result<(), SynthError> {
        if let Some(backend) = self.backend.as_mut() {
            backend.start()?;
        }
        lock(&self.mixer)?.running = true;
        Ok(())
    }

    fn create_tone_generator(&mut self) -> Result<SoftwareTone, SynthError> {
        let mut mixer = lock(&self.mixer)?;
        let id = mixer.allocate_id();
        let origin = mixer.now();
        mixer.tones.insert(
            id,
            ToneSlot {
                waveform: Waveform::Sine,
                frequency: Automation::new(440.0, origin),
                phase: 0.0,
                gain: None,
                started: false,
                stop_at: None,
                released: false,
            },
        );
        Ok(SoftwareTone {
            id,
            mixer: self.mixer.clone(),
        })
    }

    fn create_gain_control(&mut self) -> Result<SoftwareGain, SynthError> {
        let mut mixer = lock(&self.mixer)?;
        let id = mixer.allocate_id();
        let origin = mixer.now();
        mixer.gains.insert(
            id,
            GainSlot {
                level: Automation::new(1.0, origin),
                route: None,
                released: false,
            },
        );
        Ok(SoftwareGain {
            id,
            mixer: self.mixer.clone(),
        })
    }

    fn connect_tone(&mut self, tone: &SoftwareTone, gain: &SoftwareGain) -> Result<(), SynthError> {
        lock(&self.mixer)?.tone_mut(tone.id)?.gain = Some(gain.id);
        Ok(())
    }

    fn connect_gain(&mut self, from: &SoftwareGain, to: &SoftwareGain) -> Result<(), SynthError> {
        lock(&self.mixer)?.gain_mut(from.id)?.route = Some(Route::Gain(to.id));
        Ok(())
    }

    fn connect_to_output(&mut self, gain: &SoftwareGain) -> Result<(), SynthError> {
        lock(&self.mixer)?.gain_mut(gain.id)?.route = Some(Route::Output);
        Ok(())
    }
}

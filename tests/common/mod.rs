// Shared fakes for the integration tests. Not every test file uses every item.
#![allow(dead_code)]

use rustkeysynth::audio::automation::Automation;
use rustkeysynth::audio::{AudioEngine, EngineState, GainControl, ToneGenerator};
use rustkeysynth::input::Surface;
use rustkeysynth::synth::{SurfaceColors, SynthError, Waveform};
use std::cell::RefCell;
use std::rc::Rc;

/// Every engine operation, in the order the synth issued it.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Resume,
    CreateTone(u32),
    CreateGain(u32),
    SetFrequency { tone: u32, hz: f64, time: f64 },
    SetWaveform { tone: u32, waveform: Waveform },
    Start { tone: u32 },
    Stop { tone: u32, time: f64 },
    DropTone { tone: u32 },
    SetValue { gain: u32, value: f32, time: f64 },
    LinearRamp { gain: u32, value: f32, time: f64 },
    ExponentialRamp { gain: u32, value: f32, time: f64 },
    Cancel { gain: u32, time: f64 },
    ConnectTone { tone: u32, gain: u32 },
    ConnectGain { from: u32, to: u32 },
    ConnectOutput { gain: u32 },
}

#[derive(Debug)]
struct Shared {
    now: f64,
    state: EngineState,
    next_id: u32,
    calls: Vec<Call>,
    fail_exponential_ramps: bool,
}

/// Engine fake that records calls and whose clock only moves when told to.
#[derive(Debug, Clone)]
pub struct RecordingEngine {
    shared: Rc<RefCell<Shared>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::with_state(EngineState::Running)
    }

    pub fn suspended() -> Self {
        Self::with_state(EngineState::Suspended)
    }

    fn with_state(state: EngineState) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                now: 0.0,
                state,
                next_id: 0,
                calls: Vec::new(),
                fail_exponential_ramps: false,
            })),
        }
    }

    pub fn set_time(&self, now: f64) {
        self.shared.borrow_mut().now = now;
    }

    pub fn advance(&self, seconds: f64) {
        self.shared.borrow_mut().now += seconds;
    }

    /// Makes every later exponential ramp fail after it is recorded.
    pub fn fail_exponential_ramps(&self) {
        self.shared.borrow_mut().fail_exponential_ramps = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.shared.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.shared.borrow_mut().calls.clear();
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.shared.borrow().calls.iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        self.shared.borrow_mut().calls.push(call);
    }

    fn allocate(&self) -> u32 {
        let mut shared = self.shared.borrow_mut();
        shared.next_id += 1;
        shared.next_id
    }
}

#[derive(Debug)]
pub struct RecordingTone {
    pub id: u32,
    engine: RecordingEngine,
}

impl ToneGenerator for RecordingTone {
    fn set_frequency(&mut self, hz: f64, time: f64) -> Result<(), SynthError> {
        self.engine.record(Call::SetFrequency {
            tone: self.id,
            hz,
            time,
        });
        Ok(())
    }

    fn set_waveform(&mut self, waveform: Waveform) -> Result<(), SynthError> {
        self.engine.record(Call::SetWaveform {
            tone: self.id,
            waveform,
        });
        Ok(())
    }

    fn start(&mut self) -> Result<(), SynthError> {
        self.engine.record(Call::Start { tone: self.id });
        Ok(())
    }

    fn stop(&mut self, time: f64) -> Result<(), SynthError> {
        self.engine.record(Call::Stop {
            tone: self.id,
            time,
        });
        Ok(())
    }
}

impl Drop for RecordingTone {
    fn drop(&mut self) {
        self.engine.record(Call::DropTone { tone: self.id });
    }
}

#[derive(Debug)]
pub struct RecordingGain {
    pub id: u32,
    engine: RecordingEngine,
    level: Automation,
}

impl GainControl for RecordingGain {
    fn value(&self) -> f32 {
        self.level.value_at(self.engine.shared.borrow().now)
    }

    fn set_value_at_time(&mut self, value: f32, time: f64) -> Result<(), SynthError> {
        self.engine.record(Call::SetValue {
            gain: self.id,
            value,
            time,
        });
        self.level.set_value_at_time(value, time)
    }

    fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> Result<(), SynthError> {
        self.engine.record(Call::LinearRamp {
            gain: self.id,
            value,
            time,
        });
        self.level.linear_ramp_to_value_at_time(value, time)
    }

    fn exponential_ramp_to_value_at_time(
        &mut self,
        value: f32,
        time: f64,
    ) -> Result<(), SynthError> {
        self.engine.record(Call::ExponentialRamp {
            gain: self.id,
            value,
            time,
        });
        if self.engine.shared.borrow().fail_exponential_ramps {
            return Err(SynthError::Engine("exponential ramp rejected".to_string()));
        }
        self.level.exponential_ramp_to_value_at_time(value, time)
    }

    fn cancel_scheduled_values(&mut self, time: f64) -> Result<(), SynthError> {
        self.engine.record(Call::Cancel {
            gain: self.id,
            time,
        });
        self.level.cancel_scheduled_values(time);
        Ok(())
    }
}

impl AudioEngine for RecordingEngine {
    type Tone = RecordingTone;
    type Gain = RecordingGain;

    fn current_time(&self) -> f64 {
        self.shared.borrow().now
    }

    fn state(&self) -> EngineState {
        self.shared.borrow().state
    }

    fn resume(&mut self) -> Result<(), SynthError> {
        self.record(Call::Resume);
        self.shared.borrow_mut().state = EngineState::Running;
        Ok(())
    }

    fn create_tone_generator(&mut self) -> Result<RecordingTone, SynthError> {
        let id = self.allocate();
        self.record(Call::CreateTone(id));
        Ok(RecordingTone {
            id,
            engine: self.clone(),
        })
    }

    fn create_gain_control(&mut self) -> Result<RecordingGain, SynthError> {
        let id = self.allocate();
        self.record(Call::CreateGain(id));
        let origin = self.current_time();
        Ok(RecordingGain {
            id,
            engine: self.clone(),
            level: Automation::new(1.0, origin),
        })
    }

    fn connect_tone(
        &mut self,
        tone: &RecordingTone,
        gain: &RecordingGain,
    ) -> Result<(), SynthError> {
        self.record(Call::ConnectTone {
            tone: tone.id,
            gain: gain.id,
        });
        Ok(())
    }

    fn connect_gain(&mut self, from: &RecordingGain, to: &RecordingGain) -> Result<(), SynthError> {
        self.record(Call::ConnectGain {
            from: from.id,
            to: to.id,
        });
        Ok(())
    }

    fn connect_to_output(&mut self, gain: &RecordingGain) -> Result<(), SynthError> {
        self.record(Call::ConnectOutput { gain: gain.id });
        Ok(())
    }
}

/// Surface fake keeping every color it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub applied: Vec<SurfaceColors>,
}

impl Surface for RecordingSurface {
    fn apply(&mut self, colors: SurfaceColors) -> Result<(), SynthError> {
        self.applied.push(colors);
        Ok(())
    }
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} (+/- {tolerance}), got {actual}"
    );
}

pub mod automation;

#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
mod cpal_backend;
#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
pub mod software;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub mod web;

#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
pub use self::cpal_backend::CpalBackend;
#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
pub use self::software::SoftwareEngine;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub use self::web::WebAudioEngine;

use crate::synth::error::SynthError;
use crate::synth::waveform::Waveform;

/// Power state of an engine's processing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Suspended,
    Running,
    Closed,
}

/// An oscillator owned by exactly one voice.
pub trait ToneGenerator {
    fn set_frequency(&mut self, hz: f64, time: f64) -> Result<(), SynthError>;
    fn set_waveform(&mut self, waveform: Waveform) -> Result<(), SynthError>;
    fn start(&mut self) -> Result<(), SynthError>;
    fn stop(&mut self, time: f64) -> Result<(), SynthError>;
}

/// A gain stage whose level follows a timeline of scheduled changes.
/// Times are on the owning engine's clock, in seconds.
pub trait GainControl {
    /// Level at the engine's present time.
    fn value(&self) -> f32;
    fn set_value_at_time(&mut self, value: f32, time: f64) -> Result<(), SynthError>;
    fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> Result<(), SynthError>;
    fn exponential_ramp_to_value_at_time(&mut self, value: f32, time: f64)
        -> Result<(), SynthError>;
    /// Drops every scheduled change at or after `time`.
    fn cancel_scheduled_values(&mut self, time: f64) -> Result<(), SynthError>;
}

/// The audio backend the synth schedules against.
///
/// The synth never renders audio itself; it only creates nodes, wires them
/// tone -> voice gain -> master gain -> output and schedules timestamped
/// changes.
pub trait AudioEngine {
    type Tone: ToneGenerator;
    type Gain: GainControl;

    fn current_time(&self) -> f64;
    fn state(&self) -> EngineState;
    fn resume(&mut self) -> Result<(), SynthError>;

    fn create_tone_generator(&mut self) -> Result<Self::Tone, SynthError>;
    fn create_gain_control(&mut self) -> Result<Self::Gain, SynthError>;

    fn connect_tone(&mut self, tone: &Self::Tone, gain: &Self::Gain) -> Result<(), SynthError>;
    fn connect_gain(&mut self, from: &Self::Gain, to: &Self::Gain) -> Result<(), SynthError>;
    fn connect_to_output(&mut self, gain: &Self::Gain) -> Result<(), SynthError>;
}

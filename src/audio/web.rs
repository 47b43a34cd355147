use super::{AudioEngine, EngineState, GainControl, ToneGenerator};
use crate::synth::error::SynthError;
use crate::synth::waveform::Waveform;
use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

pub struct WebTone {
    node: OscillatorNode,
}

impl ToneGenerator for WebTone {
    fn set_frequency(&mut self, hz: f64, time: f64) -> Result<(), SynthError> {
        self.node.frequency().set_value_at_time(hz as f32, time)?;
        Ok(())
    }

    fn set_waveform(&mut self, waveform: Waveform) -> Result<(), SynthError> {
        self.node.set_type(oscillator_type(waveform));
        Ok(())
    }

    fn start(&mut self) -> Result<(), SynthError> {
        self.node.start()?;
        Ok(())
    }

    fn stop(&mut self, time: f64) -> Result<(), SynthError> {
        self.node.stop_with_when(time)?;
        Ok(())
    }
}

pub struct WebGain {
    node: GainNode,
}

impl GainControl for WebGain {
    fn value(&self) -> f32 {
        self.node.gain().value()
    }

    fn set_value_at_time(&mut self, value: f32, time: f64) -> Result<(), SynthError> {
        self.node.gain().set_value_at_time(value, time)?;
        Ok(())
    }

    fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> Result<(), SynthError> {
        self.node.gain().linear_ramp_to_value_at_time(value, time)?;
        Ok(())
    }

    fn exponential_ramp_to_value_at_time(
        &mut self,
        value: f32,
        time: f64,
    ) -> Result<(), SynthError> {
        self.node
            .gain()
            .exponential_ramp_to_value_at_time(value, time)?;
        Ok(())
    }

    fn cancel_scheduled_values(&mut self, time: f64) -> Result<(), SynthError> {
        self.node.gain().cancel_scheduled_values(time)?;
        Ok(())
    }
}

/// The browser's Web Audio API behind the engine traits.
pub struct WebAudioEngine {
    context: AudioContext,
}

impl WebAudioEngine {
    pub fn new() -> Result<Self, SynthError> {
        Ok(Self {
            context: AudioContext::new()?,
        })
    }
}

impl AudioEngine for WebAudioEngine {
    type Tone = WebTone;
    type Gain = WebGain;

    fn current_time(&self) -> f64 {
        self.context.current_time()
    }

    fn state(&self) -> EngineState {
        match self.context.state() {
            AudioContextState::Running => EngineState::Running,
            AudioContextState::Suspended => EngineState::Suspended,
            _ => EngineState::Closed,
        }
    }

    /// Requests a resume; scheduling against the context clock works while
    /// the returned promise is still pending.
    fn resume(&mut self) -> Result<(), SynthError> {
        let _ = self.context.resume()?;
        Ok(())
    }

    fn create_tone_generator(&mut self) -> Result<WebTone, SynthError> {
        Ok(WebTone {
            node: self.context.create_oscillator()?,
        })
    }

    fn create_gain_control(&mut self) -> Result<WebGain, SynthError> {
        Ok(WebGain {
            node: self.context.create_gain()?,
        })
    }

    fn connect_tone(&mut self, tone: &WebTone, gain: &WebGain) -> Result<(), SynthError> {
        tone.node.connect_with_audio_node(&gain.node)?;
        Ok(())
    }

    fn connect_gain(&mut self, from: &WebGain, to: &WebGain) -> Result<(), SynthError> {
        from.node.connect_with_audio_node(&to.node)?;
        Ok(())
    }

    fn connect_to_output(&mut self, gain: &WebGain) -> Result<(), SynthError> {
        gain.node
            .connect_with_audio_node(&self.context.destination())?;
        Ok(())
    }
}

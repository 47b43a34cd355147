use super::prelude::{fmt, PI};
use std::str::FromStr;

/// Oscillator shapes offered by the waveform selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWaveform(pub String);

impl fmt::Display for UnknownWaveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown waveform '{}'", self.0)
    }
}

impl std::error::Error for UnknownWaveform {}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    /// Name used by the `<select>` options and Web Audio's `OscillatorType`.
    pub fn as_str(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }

    /// One sample of the waveform at `phase` radians, in `[-1, 1]`.
    pub fn evaluate(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if phase.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => {
                let cycles = phase / (2.0 * PI);
                2.0 * (cycles - (cycles + 0.5).floor())
            }
            Waveform::Triangle => (2.0 / PI) * (phase.sin()).asin(),
        }
    }

    pub fn cycle(self, direction: CycleDirection) -> Self {
        let index = Self::ALL.iter().position(|w| *w == self).unwrap_or(0);
        let len = Self::ALL.len();
        let next = match direction {
            CycleDirection::Forward => (index + 1) % len,
            CycleDirection::Backward => (index + len - 1) % len,
        };
        Self::ALL[next]
    }
}

impl FromStr for Waveform {
    type Err = UnknownWaveform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" => Ok(Waveform::Sine),
            "square" => Ok(Waveform::Square),
            "sawtooth" => Ok(Waveform::Sawtooth),
            "triangle" => Ok(Waveform::Triangle),
            _ => Err(UnknownWaveform(s.to_string())),
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

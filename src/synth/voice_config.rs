use super::error::SynthError;

/// Envelope timing and levels applied to every voice.
/// Times are in seconds, levels are linear gain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnvelopeConfig {
    pub attack: f64,
    /// Gain reached at the end of the attack, kept below clipping.
    pub peak: f32,
    pub release: f64,
    /// Target of the exponential release; must be above zero.
    pub release_floor: f32,
    /// Extra time between the end of the release ramp and the hard stop.
    pub stop_margin: f64,
}

impl EnvelopeConfig {
    pub fn validate(&self) -> Result<(), SynthError> {
        if !(self.attack >= 0.0 && self.release >= 0.0 && self.stop_margin >= 0.0) {
            return Err(SynthError::Config(format!(
                "envelope times must be non-negative (attack {}, release {}, stop margin {})",
                self.attack, self.release, self.stop_margin
            )));
        }
        if !(self.release_floor > 0.0) {
            return Err(SynthError::Config(format!(
                "release floor must be positive, got {}",
                self.release_floor
            )));
        }
        if !(self.peak > 0.0) {
            return Err(SynthError::Config(format!(
                "peak gain must be positive, got {}",
                self.peak
            )));
        }
        Ok(())
    }

    /// Time from release start until the tone generator is stopped.
    pub fn tail_length(&self) -> f64 {
        self.release + self.stop_margin
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: 0.05,
            peak: 0.2,
            release: 0.2,
            release_floor: 0.001,
            stop_margin: 0.05,
        }
    }
}

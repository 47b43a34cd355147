use super::color::Rgb;
use super::error::SynthError;
use super::pitch::PitchTable;
use super::voice_config::EnvelopeConfig;
use super::waveform::Waveform;

/// What to do when a key is pressed again while its previous note is still
/// fading out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RetriggerPolicy {
    /// Let the old tail finish underneath the new note.
    #[default]
    Overlap,
    /// Silence the old tail immediately before the new attack.
    CutTail,
}

/// Top-level synth settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SynthConfig {
    pub envelope: EnvelopeConfig,
    /// Level of the shared gain stage every voice is mixed through.
    pub master_gain: f32,
    /// Frequency domain for the color gradient; the pitch table's range when unset.
    pub frequency_domain: Option<(f64, f64)>,
    pub retrigger: RetriggerPolicy,
    /// Defaults for hosts without color pickers.
    pub start_color: Rgb,
    pub end_color: Rgb,
    pub waveform: Waveform,
    /// Preferred output device name (native only).
    pub output_device: Option<String>,
}

impl SynthConfig {
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, SynthError> {
        let config: SynthConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SynthError> {
        self.envelope.validate()?;
        if !(0.0..=1.0).contains(&self.master_gain) {
            return Err(SynthError::Config(format!(
                "master gain must be within 0.0..=1.0, got {}",
                self.master_gain
            )));
        }
        if let Some((min, max)) = self.frequency_domain {
            if !(min.is_finite() && max.is_finite() && max > min) {
                return Err(SynthError::Config(format!(
                    "frequency domain must be increasing, got [{min}, {max}]"
                )));
            }
        }
        Ok(())
    }

    /// Color domain to use with `table`.
    pub fn domain_for(&self, table: &PitchTable) -> (f64, f64) {
        self.frequency_domain
            .unwrap_or((table.min_frequency(), table.max_frequency()))
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            envelope: EnvelopeConfig::default(),
            master_gain: 0.8,
            frequency_domain: None,
            retrigger: RetriggerPolicy::default(),
            start_color: Rgb::new(0x00, 0x00, 0x00),
            end_color: Rgb::new(0xff, 0xff, 0xff),
            waveform: Waveform::Sine,
            output_device: None,
        }
    }
}

use super::prelude::fmt;

/// Errors surfaced by the synth core and its engines.
///
/// Ignored key events are not errors; see `KeyOutcome` for those.
#[derive(Debug)]
pub enum SynthError {
    /// The audio engine rejected an operation.
    Engine(String),
    /// No usable output device or stream.
    Device(String),
    /// A UI color value could not be parsed.
    Color(ColorParseError),
    /// Configuration failed to load or validate.
    Config(String),
    /// An automation event that the timeline cannot represent.
    InvalidAutomation { value: f32, time: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    MissingHash(String),
    BadLength(String),
    BadDigit(String),
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::Engine(msg) => write!(f, "Audio engine error: {msg}"),
            SynthError::Device(msg) => write!(f, "Audio device error: {msg}"),
            SynthError::Color(e) => write!(f, "Color error: {e}"),
            SynthError::Config(msg) => write!(f, "Config error: {msg}"),
            SynthError::InvalidAutomation { value, time } => {
                write!(f, "Invalid automation event: value {value} at {time:.3}s")
            }
        }
    }
}

impl std::error::Error for SynthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SynthError::Color(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::MissingHash(s) => write!(f, "'{s}' does not start with '#'"),
            ColorParseError::BadLength(s) => write!(f, "'{s}' is not of the form #rrggbb"),
            ColorParseError::BadDigit(s) => write!(f, "'{s}' contains a non-hex digit"),
        }
    }
}

impl std::error::Error for ColorParseError {}

impl From<ColorParseError> for SynthError {
    fn from(e: ColorParseError) -> Self {
        SynthError::Color(e)
    }
}

impl From<serde_json::Error> for SynthError {
    fn from(e: serde_json::Error) -> Self {
        SynthError::Config(e.to_string())
    }
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
impl From<wasm_bindgen::JsValue> for SynthError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        SynthError::Engine(format!("{value:?}"))
    }
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
impl From<SynthError> for wasm_bindgen::JsValue {
    fn from(e: SynthError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
impl From<cpal::BuildStreamError> for SynthError {
    fn from(e: cpal::BuildStreamError) -> Self {
        SynthError::Device(e.to_string())
    }
}

#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
impl From<cpal::PlayStreamError> for SynthError {
    fn from(e: cpal::PlayStreamError) -> Self {
        SynthError::Device(e.to_string())
    }
}

#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
impl From<cpal::PauseStreamError> for SynthError {
    fn from(e: cpal::PauseStreamError) -> Self {
        SynthError::Device(e.to_string())
    }
}

#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
impl From<cpal::DefaultStreamConfigError> for SynthError {
    fn from(e: cpal::DefaultStreamConfigError) -> Self {
        SynthError::Device(e.to_string())
    }
}

#[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
impl From<cpal::DevicesError> for SynthError {
    fn from(e: cpal::DevicesError) -> Self {
        SynthError::Device(e.to_string())
    }
}

pub mod color;
pub mod config;
pub mod envelope;
pub mod error;
pub mod key;
pub mod pitch;
pub mod prelude;
pub mod registry;
pub mod voice;
pub mod voice_config;
pub mod waveform;

pub use self::color::{ColorRange, Rgb, SurfaceColors, TextColor};
pub use self::config::{RetriggerPolicy, SynthConfig};
pub use self::envelope::EnvelopeScheduler;
pub use self::error::{ColorParseError, SynthError};
pub use self::key::{KeyEvent, KeyId};
pub use self::pitch::PitchTable;
pub use self::registry::VoiceRegistry;
pub use self::voice::{EngineVoice, EnvelopeState, Voice};
pub use self::voice_config::EnvelopeConfig;
pub use self::waveform::{CycleDirection, Waveform};

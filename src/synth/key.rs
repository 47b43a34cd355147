use super::prelude::fmt;
use std::str::FromStr;

/// Identifies a physical key by its browser key code (`90` is Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub u32);

impl KeyId {
    pub fn code(self) -> u32 {
        self.0
    }

    /// Key code for a letter or digit, following the browser convention of
    /// using the uppercase ASCII value.
    pub fn from_char(ch: char) -> Option<Self> {
        if ch.is_ascii_alphanumeric() {
            Some(Self(ch.to_ascii_uppercase() as u32))
        } else {
            None
        }
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for KeyId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self)
    }
}

impl From<u32> for KeyId {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

/// A raw key transition delivered by whatever event loop hosts the synth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyId,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn down(key: impl Into<KeyId>) -> Self {
        Self {
            key: key.into(),
            pressed: true,
        }
    }

    pub fn up(key: impl Into<KeyId>) -> Self {
        Self {
            key: key.into(),
            pressed: false,
        }
    }
}

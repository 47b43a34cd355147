use super::key::KeyId;
use super::prelude::{HashMap, OnceLock};

/// Key codes of the two-octave layout, lowest pitch first.
/// Bottom row plus home row for C4..B4, top row plus number row for C5..B5.
const KEY_LAYOUT: [u32; 24] = [
    90, 83, 88, 68, 67, 86, 71, 66, 72, 78, 74, 77, // Z S X D C V G B H N J M
    81, 50, 87, 51, 69, 82, 53, 84, 54, 89, 55, 85, // Q 2 W 3 E R 5 T 6 Y 7 U
];

/// MIDI note number of the first key (C4).
const FIRST_NOTE: u8 = 60;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Equal-tempered frequency of a MIDI note with A4 = 440 Hz.
pub fn midi_to_frequency(note: u8) -> f64 {
    440.0 * 2f64.powf((f64::from(note) - 69.0) / 12.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub key: KeyId,
    pub midi_number: u8,
    pub name: String,
    pub frequency: f64,
}

/// Immutable mapping from key to pitch.
#[derive(Debug, Clone)]
pub struct PitchTable {
    notes: HashMap<KeyId, Note>,
    min_frequency: f64,
    max_frequency: f64,
}

impl PitchTable {
    /// The process-wide two-octave table, built on first use.
    pub fn standard() -> &'static PitchTable {
        static TABLE: OnceLock<PitchTable> = OnceLock::new();
        TABLE.get_or_init(|| PitchTable::from_layout(&KEY_LAYOUT, FIRST_NOTE))
    }

    /// Builds a chromatic table assigning consecutive semitones from
    /// `first_note` to `keys`.
    pub fn from_layout(keys: &[u32], first_note: u8) -> Self {
        let mut notes = HashMap::new();
        let mut min_frequency = f64::INFINITY;
        let mut max_frequency = 0.0f64;

        for (offset, &code) in keys.iter().enumerate() {
            let midi_number = first_note.saturating_add(offset as u8);
            let frequency = midi_to_frequency(midi_number);
            let name = format!(
                "{}{}",
                NOTE_NAMES[usize::from(midi_number % 12)],
                i32::from(midi_number / 12) - 1
            );
            min_frequency = min_frequency.min(frequency);
            max_frequency = max_frequency.max(frequency);
            let key = KeyId(code);
            notes.insert(
                key,
                Note {
                    key,
                    midi_number,
                    name,
                    frequency,
                },
            );
        }

        if notes.is_empty() {
            min_frequency = 0.0;
        }

        Self {
            notes,
            min_frequency,
            max_frequency,
        }
    }

    /// Frequency in Hz for `key`, or `None` if the key is not playable.
    pub fn lookup(&self, key: KeyId) -> Option<f64> {
        self.notes.get(&key).map(|note| note.frequency)
    }

    pub fn note(&self, key: KeyId) -> Option<&Note> {
        self.notes.get(&key)
    }

    pub fn min_frequency(&self) -> f64 {
        self.min_frequency
    }

    pub fn max_frequency(&self) -> f64 {
        self.max_frequency
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes in ascending pitch order.
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        let mut notes: Vec<&Note> = self.notes.values().collect();
        notes.sort_by_key(|note| note.midi_number);
        notes.into_iter()
    }
}

impl Default for PitchTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}

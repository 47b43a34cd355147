//! A computer-keyboard synthesizer: keys map to pitches, each held key
//! sounds one enveloped voice, and every new note tints the display with a
//! color taken from its place in the keyboard's pitch range.
//!
//! The voice logic in [`input::InputDispatcher`] is independent of any audio
//! backend; it schedules against an injected [`audio::AudioEngine`]. The
//! `native` feature supplies a `cpal` software engine and a polling keyboard,
//! the `wasm` feature binds the same logic to Web Audio and the DOM.

pub mod audio;
pub mod input;
pub mod runtime;
pub mod synth;

#![cfg(all(not(target_arch = "wasm32"), feature = "native"))]

use device_query::Keycode;
use rustkeysynth::input::{key_id, Surface};
use rustkeysynth::runtime::native::TerminalSurface;
use rustkeysynth::synth::{KeyId, PitchTable, Rgb, SurfaceColors};

#[test]
fn device_keys_map_to_browser_codes() {
    assert_eq!(key_id(Keycode::Z), Some(KeyId(90)));
    assert_eq!(key_id(Keycode::Key2), Some(KeyId(50)));
    assert_eq!(key_id(Keycode::Space), None);
    assert_eq!(key_id(Keycode::Escape), None);
}

#[test]
fn every_pitch_key_is_reachable_from_the_device() {
    let table = PitchTable::standard();
    let reachable = [
        Keycode::Z,
        Keycode::S,
        Keycode::X,
        Keycode::D,
        Keycode::C,
        Keycode::V,
        Keycode::G,
        Keycode::B,
        Keycode::H,
        Keycode::N,
        Keycode::J,
        Keycode::M,
        Keycode::Q,
        Keycode::Key2,
        Keycode::W,
        Keycode::Key3,
        Keycode::E,
        Keycode::R,
        Keycode::Key5,
        Keycode::T,
        Keycode::Key6,
        Keycode::Y,
        Keycode::Key7,
        Keycode::U,
    ];
    let codes: Vec<KeyId> = reachable.iter().filter_map(|k| key_id(*k)).collect();
    let ordered: Vec<KeyId> = table.iter().map(|note| note.key).collect();
    assert_eq!(codes, ordered);
}

#[test]
fn terminal_surface_prints_a_true_color_swatch() {
    let mut surface = TerminalSurface::new(Vec::new());
    surface
        .apply(SurfaceColors::for_background(Rgb::new(63, 63, 63)))
        .unwrap();

    let written = String::from_utf8(surface.into_inner()).unwrap();
    assert!(written.starts_with("\x1b[48;2;63;63;63m\x1b[38;2;255;255;255m"));
    assert!(written.contains("rgb(63, 63, 63)"));
    assert!(written.ends_with("\x1b[0m\n"));
}

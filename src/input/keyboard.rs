use crate::synth::key::{KeyEvent, KeyId};
use crate::synth::waveform::CycleDirection;
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::collections::HashMap;
use std::sync::mpsc::Sender;

/// Non-note keys understood by the native runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    CycleWaveform { direction: CycleDirection },
    Quit,
}

/// Browser key code for a `device_query` key, for the keys the pitch table
/// can use.
pub fn key_id(keycode: Keycode) -> Option<KeyId> {
    let ch = match keycode {
        Keycode::Key0 => '0',
        Keycode::Key1 => '1',
        Keycode::Key2 => '2',
        Keycode::Key3 => '3',
        Keycode::Key4 => '4',
        Keycode::Key5 => '5',
        Keycode::Key6 => '6',
        Keycode::Key7 => '7',
        Keycode::Key8 => '8',
        Keycode::Key9 => '9',
        Keycode::A => 'A',
        Keycode::B => 'B',
        Keycode::C => 'C',
        Keycode::D => 'D',
        Keycode::E => 'E',
        Keycode::F => 'F',
        Keycode::G => 'G',
        Keycode::H => 'H',
        Keycode::I => 'I',
        Keycode::J => 'J',
        Keycode::K => 'K',
        Keycode::L => 'L',
        Keycode::M => 'M',
        Keycode::N => 'N',
        Keycode::O => 'O',
        Keycode::P => 'P',
        Keycode::Q => 'Q',
        Keycode::R => 'R',
        Keycode::S => 'S',
        Keycode::T => 'T',
        Keycode::U => 'U',
        Keycode::V => 'V',
        Keycode::W => 'W',
        Keycode::X => 'X',
        Keycode::Y => 'Y',
        Keycode::Z => 'Z',
        _ => return None,
    };
    KeyId::from_char(ch)
}

/// Polls the keyboard and turns state changes into key events.
pub struct KeyboardHandler {
    device_state: DeviceState,
    key_states: HashMap<Keycode, bool>,
    control_keys: HashMap<Keycode, bool>,
    key_sender: Sender<KeyEvent>,
    control_sender: Sender<ControlEvent>,
}

impl KeyboardHandler {
    pub fn new(key_sender: Sender<KeyEvent>, control_sender: Sender<ControlEvent>) -> Self {
        let control_keys: HashMap<Keycode, bool> = [Keycode::Comma, Keycode::Dot, Keycode::Escape]
            .iter()
            .map(|key| (*key, false))
            .collect();

        Self {
            device_state: DeviceState::new(),
            key_states: HashMap::new(),
            control_keys,
            key_sender,
            control_sender,
        }
    }

    pub fn update(&mut self) {
        let keys: Vec<Keycode> = self.device_state.get_keys();

        // Newly pressed keys
        for key in &keys {
            let Some(id) = key_id(*key) else {
                continue;
            };
            let was_pressed = self.key_states.insert(*key, true).unwrap_or(false);
            if !was_pressed {
                if let Err(e) = self.key_sender.send(KeyEvent::down(id)) {
                    log::error!("Error sending key down event: {}", e);
                }
            }
        }

        // Released keys
        for (key, pressed) in self.key_states.iter_mut() {
            if *pressed && !keys.contains(key) {
                *pressed = false;
                if let Some(id) = key_id(*key) {
                    if let Err(e) = self.key_sender.send(KeyEvent::up(id)) {
                        log::error!("Error sending key up event: {}", e);
                    }
                }
            }
        }

        for (key, was_pressed) in self.control_keys.iter_mut() {
            let is_pressed = keys.contains(key);
            if is_pressed && !*was_pressed {
                let event = match key {
                    Keycode::Comma => ControlEvent::CycleWaveform {
                        direction: CycleDirection::Backward,
                    },
                    Keycode::Dot => ControlEvent::CycleWaveform {
                        direction: CycleDirection::Forward,
                    },
                    _ => ControlEvent::Quit,
                };
                if let Err(e) = self.control_sender.send(event) {
                    log::error!("Error sending control event: {}", e);
                }
            }
            *was_pressed = is_pressed;
        }
    }
}

use crate::audio::SoftwareEngine;
use crate::input::{ControlEvent, InputDispatcher, KeyboardHandler, StaticControls, Surface};
use crate::synth::color::SurfaceColors;
use crate::synth::config::SynthConfig;
use crate::synth::error::SynthError;
use crate::synth::key::KeyEvent;
use std::io::Write;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "RUSTKEYSYNTH_CONFIG";

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Prints the pitch color as a true-color swatch on the terminal.
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn apply(&mut self, colors: SurfaceColors) -> Result<(), SynthError> {
        let bg = colors.background;
        let fg = colors.text.rgb();
        writeln!(
            self.out,
            "\x1b[48;2;{};{};{}m\x1b[38;2;{};{};{}m  {}  \x1b[0m",
            bg.r,
            bg.g,
            bg.b,
            fg.r,
            fg.g,
            fg.b,
            colors.background.to_css()
        )
        .and_then(|_| self.out.flush())
        .map_err(|e| SynthError::Device(format!("terminal write failed: {e}")))
    }
}

/// Desktop runtime: key events from the polling thread are dispatched here,
/// one at a time.
pub struct NativeKeyboard {
    dispatcher: InputDispatcher<SoftwareEngine>,
    controls: StaticControls,
    surface: TerminalSurface<std::io::Stdout>,
    key_receiver: Receiver<KeyEvent>,
    control_receiver: Receiver<ControlEvent>,
}

impl NativeKeyboard {
    pub fn new(
        config: &SynthConfig,
        engine: SoftwareEngine,
        key_receiver: Receiver<KeyEvent>,
        control_receiver: Receiver<ControlEvent>,
    ) -> Result<Self, SynthError> {
        Ok(Self {
            dispatcher: InputDispatcher::new(engine, config)?,
            controls: StaticControls::from_config(config),
            surface: TerminalSurface::new(std::io::stdout()),
            key_receiver,
            control_receiver,
        })
    }

    /// Handles everything queued so far. Returns false once quit was requested.
    pub fn process_events(&mut self) -> bool {
        while let Ok(event) = self.control_receiver.try_recv() {
            match event {
                ControlEvent::CycleWaveform { direction } => {
                    self.controls.cycle_waveform(direction);
                    log::info!("Waveform: {}", self.controls.waveform);
                }
                ControlEvent::Quit => return false,
            }
        }

        while let Ok(event) = self.key_receiver.try_recv() {
            if let Err(e) = self
                .dispatcher
                .dispatch(event, &self.controls, &mut self.surface)
            {
                log::error!("Error handling key {}: {}", event.key, e);
            }
        }
        true
    }

    /// Releases held keys and returns how long their tails still need.
    pub fn shutdown(&mut self, tail: Duration) -> Duration {
        match self.dispatcher.release_all() {
            Ok(0) => Duration::ZERO,
            Ok(_) => tail,
            Err(e) => {
                log::error!("Error releasing keys: {}", e);
                Duration::ZERO
            }
        }
    }
}

pub fn load_config() -> Result<SynthConfig, SynthError> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| SynthError::Config(format!("cannot read {path}: {e}")))?;
            log::info!("Loaded config from {}", path);
            SynthConfig::from_json(&json)
        }
        Err(_) => Ok(SynthConfig::default()),
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let engine = SoftwareEngine::with_output(config.output_device.as_deref())?;
    log::info!("Software engine running at {} Hz", engine.sample_rate());

    let (key_tx, key_rx) = channel();
    let (control_tx, control_rx) = channel();
    let mut keyboard_handler = KeyboardHandler::new(key_tx, control_tx);
    let mut keyboard = NativeKeyboard::new(&config, engine, key_rx, control_rx)?;

    println!("Play with Z..M and Q..U (sharps on S D G H J and 2 3 5 6 7).");
    println!("',' and '.' cycle the waveform, Esc quits.");

    loop {
        keyboard_handler.update();
        if !keyboard.process_events() {
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    let tail = Duration::from_secs_f64(config.envelope.tail_length());
    std::thread::sleep(keyboard.shutdown(tail));
    keyboard.dispatcher.engine_mut().suspend()?;
    Ok(())
}

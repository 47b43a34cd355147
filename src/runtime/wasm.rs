use crate::audio::WebAudioEngine;
use crate::input::{Controls, InputDispatcher, KeyOutcome, Surface};
use crate::synth::color::{Rgb, SurfaceColors};
use crate::synth::config::SynthConfig;
use crate::synth::error::SynthError;
use crate::synth::key::KeyId;
use crate::synth::waveform::Waveform;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement, HtmlSelectElement, KeyboardEvent};

/// Element ids of the page's controls.
const WAVEFORM_SELECT: &str = "waveform";
const START_COLOR_INPUT: &str = "startColor";
const END_COLOR_INPUT: &str = "endColor";

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&message),
            log::Level::Warn => web_sys::console::warn_1(&message),
            log::Level::Info => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_logging() {
    // Ignore the error from a second initialisation.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

fn document() -> Result<Document, SynthError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| SynthError::Engine("no document available".to_string()))
}

/// Reads the waveform `<select>` and color `<input>`s on every call.
/// Missing elements fall back to the configured defaults.
struct DomControls {
    document: Document,
    fallback_waveform: Waveform,
    fallback_start: Rgb,
    fallback_end: Rgb,
}

impl DomControls {
    fn input_value(&self, id: &str) -> Option<String> {
        self.document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
    }

    fn color(&self, id: &str, fallback: Rgb) -> Result<Rgb, SynthError> {
        match self.input_value(id) {
            Some(hex) => Ok(Rgb::from_hex(&hex)?),
            None => Ok(fallback),
        }
    }
}

impl Controls for DomControls {
    fn waveform(&self) -> Result<Waveform, SynthError> {
        let selected = self
            .document
            .get_element_by_id(WAVEFORM_SELECT)
            .and_then(|element| element.dyn_into::<HtmlSelectElement>().ok())
            .map(|select| select.value());
        match selected {
            Some(value) => value
                .parse()
                .map_err(|e: crate::synth::waveform::UnknownWaveform| {
                    SynthError::Config(e.to_string())
                }),
            None => Ok(self.fallback_waveform),
        }
    }

    fn color_endpoints(&self) -> Result<(Rgb, Rgb), SynthError> {
        Ok((
            self.color(START_COLOR_INPUT, self.fallback_start)?,
            self.color(END_COLOR_INPUT, self.fallback_end)?,
        ))
    }
}

/// Paints `document.body`.
struct BodySurface {
    document: Document,
}

impl Surface for BodySurface {
    fn apply(&mut self, colors: SurfaceColors) -> Result<(), SynthError> {
        let Some(body) = self.document.body() else {
            return Ok(());
        };
        let style = body.style();
        style.set_property("background-color", &colors.background.to_css())?;
        style.set_property("color", colors.text.as_css())?;
        Ok(())
    }
}

/// Browser entry point: owns the Web Audio engine and the voice state.
#[wasm_bindgen]
pub struct WasmKeyboard {
    dispatcher: InputDispatcher<WebAudioEngine>,
    controls: DomControls,
    surface: BodySurface,
}

#[wasm_bindgen]
impl WasmKeyboard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmKeyboard, JsValue> {
        Ok(Self::from_config(SynthConfig::default())?)
    }

    /// Builds a keyboard from a plain JS config object.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<WasmKeyboard, JsValue> {
        let config: SynthConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| SynthError::Config(e.to_string()))?;
        Ok(Self::from_config(config)?)
    }

    /// Returns true if a new voice started.
    #[wasm_bindgen(js_name = handleKeyDown)]
    pub fn handle_key_down(&mut self, code: u32) -> Result<bool, JsValue> {
        let outcome =
            self.dispatcher
                .handle_key_down(KeyId(code), &self.controls, &mut self.surface)?;
        Ok(matches!(outcome, KeyOutcome::Started { .. }))
    }

    /// Returns true if a voice was released.
    #[wasm_bindgen(js_name = handleKeyUp)]
    pub fn handle_key_up(&mut self, code: u32) -> Result<bool, JsValue> {
        let outcome = self.dispatcher.handle_key_up(KeyId(code))?;
        Ok(matches!(outcome, KeyOutcome::Released { .. }))
    }

    #[wasm_bindgen(js_name = releaseAll)]
    pub fn release_all(&mut self) -> Result<usize, JsValue> {
        Ok(self.dispatcher.release_all()?)
    }

    #[wasm_bindgen(js_name = isSounding)]
    pub fn is_sounding(&self, code: u32) -> bool {
        self.dispatcher.is_sounding(KeyId(code))
    }
}

impl WasmKeyboard {
    fn from_config(config: SynthConfig) -> Result<WasmKeyboard, SynthError> {
        init_logging();
        let document = document()?;
        let dispatcher = InputDispatcher::new(WebAudioEngine::new()?, &config)?;
        Ok(WasmKeyboard {
            dispatcher,
            controls: DomControls {
                document: document.clone(),
                fallback_waveform: config.waveform,
                fallback_start: config.start_color,
                fallback_end: config.end_color,
            },
            surface: BodySurface { document },
        })
    }
}

/// Key code of a DOM keyboard event. Synthetic events from an on-screen
/// keyboard carry the code in `detail`.
fn event_key(event: &KeyboardEvent) -> KeyId {
    match u32::try_from(event.detail()) {
        Ok(detail) if detail != 0 => KeyId(detail),
        _ => KeyId(event.key_code()),
    }
}

fn report(result: Result<bool, JsValue>) {
    if let Err(e) = result {
        log::error!("Key handling failed: {:?}", e);
    }
}

/// Creates a keyboard and installs the global `keydown`/`keyup` listeners.
/// The listeners live for the rest of the page.
#[wasm_bindgen(js_name = installKeyboard)]
pub fn install_keyboard() -> Result<(), JsValue> {
    let keyboard = Rc::new(RefCell::new(WasmKeyboard::new()?));
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let down = {
        let keyboard = keyboard.clone();
        Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            report(keyboard.borrow_mut().handle_key_down(event_key(&event).code()));
        })
    };
    let up = {
        let keyboard = keyboard.clone();
        Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            report(keyboard.borrow_mut().handle_key_up(event_key(&event).code()));
        })
    };

    window.add_event_listener_with_callback("keydown", down.as_ref().unchecked_ref())?;
    window.add_event_listener_with_callback("keyup", up.as_ref().unchecked_ref())?;
    down.forget();
    up.forget();

    log::info!("Keyboard listeners installed");
    Ok(())
}

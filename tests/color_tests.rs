use rustkeysynth::synth::color::map;
use rustkeysynth::synth::{ColorParseError, ColorRange, Rgb, TextColor};

const MIN_FREQ: f64 = 261.625565300598634;
const MAX_FREQ: f64 = 987.766602512248223;

fn range(low: Rgb, high: Rgb) -> ColorRange {
    ColorRange::new(low, high, MIN_FREQ, MAX_FREQ)
}

#[test]
fn endpoints_map_exactly() {
    let low = Rgb::new(12, 200, 99);
    let high = Rgb::new(240, 3, 180);

    assert_eq!(map(MIN_FREQ, low, high, MIN_FREQ, MAX_FREQ), low);
    assert_eq!(map(MAX_FREQ, low, high, MIN_FREQ, MAX_FREQ), high);
}

#[test]
fn out_of_range_frequencies_clamp_to_endpoints() {
    let low = Rgb::new(255, 0, 0);
    let high = Rgb::new(0, 0, 255);
    let colors = range(low, high);

    for below in [0.0, 100.0, MIN_FREQ - 0.001] {
        assert_eq!(colors.map(below), low, "{below} Hz should clamp to low");
    }
    for above in [MAX_FREQ + 0.001, 2000.0, 20_000.0] {
        assert_eq!(colors.map(above), high, "{above} Hz should clamp to high");
    }
}

#[test]
fn a4_on_black_to_white_is_dark_grey_with_white_text() {
    let colors = range(Rgb::BLACK, Rgb::WHITE);

    let ratio = colors.ratio(440.0);
    assert!((ratio - 0.2456).abs() < 1e-3, "ratio was {ratio}");

    let background = colors.map(440.0);
    assert_eq!(background, Rgb::new(63, 63, 63));
    assert_eq!(background.brightness(), 63);
    assert_eq!(TextColor::for_background(background), TextColor::White);

    let surface = colors.colors_for(440.0);
    assert_eq!(surface.text.as_css(), "white");
    assert_eq!(surface.background.to_css(), "rgb(63, 63, 63)");
}

#[test]
fn channels_interpolate_independently() {
    let colors = range(Rgb::new(0, 100, 200), Rgb::new(200, 100, 0));
    let mid = (MIN_FREQ + MAX_FREQ) / 2.0;
    assert_eq!(colors.map(mid), Rgb::new(100, 100, 100));
}

#[test]
fn text_color_switches_above_brightness_125() {
    // 126 grey is just bright enough for black text.
    assert_eq!(Rgb::new(126, 126, 126).brightness(), 126);
    assert_eq!(TextColor::for_background(Rgb::new(126, 126, 126)), TextColor::Black);
    assert_eq!(Rgb::new(125, 125, 125).brightness(), 125);
    assert_eq!(TextColor::for_background(Rgb::new(125, 125, 125)), TextColor::White);

    assert_eq!(TextColor::for_background(Rgb::new(255, 255, 0)), TextColor::Black);
    assert_eq!(TextColor::for_background(Rgb::new(0, 0, 255)), TextColor::White);
}

#[test]
fn degenerate_domain_uses_low_color() {
    let low = Rgb::new(1, 2, 3);
    let high = Rgb::new(4, 5, 6);
    assert_eq!(map(440.0, low, high, 440.0, 440.0), low);
    assert_eq!(map(f64::NAN, low, high, MIN_FREQ, MAX_FREQ), low);
}

#[test]
fn hex_colors_parse_at_the_ui_boundary() {
    assert_eq!(Rgb::from_hex("#ff8000"), Ok(Rgb::new(255, 128, 0)));
    assert_eq!(Rgb::from_hex(" #00FFaa "), Ok(Rgb::new(0, 255, 170)));
    assert_eq!("#000000".parse::<Rgb>(), Ok(Rgb::BLACK));
    assert_eq!(Rgb::new(255, 128, 0).to_hex(), "#ff8000");

    assert!(matches!(Rgb::from_hex("ff8000"), Err(ColorParseError::MissingHash(_))));
    assert!(matches!(Rgb::from_hex("#fff"), Err(ColorParseError::BadLength(_))));
    assert!(matches!(Rgb::from_hex("#gg0000"), Err(ColorParseError::BadDigit(_))));
    assert!(matches!(Rgb::from_hex("#+12345"), Err(ColorParseError::BadDigit(_))));
}

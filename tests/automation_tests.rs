mod common;

use common::assert_close;
use rustkeysynth::audio::automation::Automation;
use rustkeysynth::synth::SynthError;

#[test]
fn holds_default_until_first_event() {
    let mut gain = Automation::new(1.0, 0.0);
    assert_eq!(gain.value_at(0.0), 1.0);
    assert_eq!(gain.value_at(10.0), 1.0);

    gain.set_value_at_time(0.5, 2.0).unwrap();
    assert_eq!(gain.value_at(1.999), 1.0);
    assert_eq!(gain.value_at(2.0), 0.5);
    assert_eq!(gain.value_at(5.0), 0.5);
}

#[test]
fn linear_ramp_interpolates_from_previous_event() {
    let mut gain = Automation::new(1.0, 0.0);
    gain.set_value_at_time(0.0, 1.0).unwrap();
    gain.linear_ramp_to_value_at_time(0.2, 1.05).unwrap();

    assert_eq!(gain.value_at(1.0), 0.0);
    assert_close(f64::from(gain.value_at(1.025)), 0.1, 1e-6);
    assert_close(f64::from(gain.value_at(1.05)), 0.2, 1e-7);
    assert_close(f64::from(gain.value_at(3.0)), 0.2, 1e-7);
}

#[test]
fn exponential_ramp_decays_geometrically() {
    let mut gain = Automation::new(1.0, 0.0);
    gain.set_value_at_time(0.2, 1.0).unwrap();
    gain.exponential_ramp_to_value_at_time(0.002, 1.2).unwrap();

    // Halfway in time is the geometric mean of the endpoints.
    assert_close(f64::from(gain.value_at(1.1)), 0.02, 1e-6);
    assert_close(f64::from(gain.value_at(1.2)), 0.002, 1e-7);
    assert_close(f64::from(gain.value_at(2.0)), 0.002, 1e-7);
}

#[test]
fn exponential_ramp_to_zero_is_rejected() {
    let mut gain = Automation::new(1.0, 0.0);
    let result = gain.exponential_ramp_to_value_at_time(0.0, 1.0);
    assert!(matches!(result, Err(SynthError::InvalidAutomation { .. })));
    assert!(gain.events().is_empty());
}

#[test]
fn non_finite_and_negative_times_are_rejected() {
    let mut gain = Automation::new(1.0, 0.0);
    assert!(gain.set_value_at_time(f32::NAN, 1.0).is_err());
    assert!(gain.set_value_at_time(0.5, f64::INFINITY).is_err());
    assert!(gain.linear_ramp_to_value_at_time(0.5, -1.0).is_err());
    assert!(gain.events().is_empty());
}

#[test]
fn cancel_drops_events_at_or_after_time() {
    let mut gain = Automation::new(1.0, 0.0);
    gain.set_value_at_time(0.0, 1.0).unwrap();
    gain.linear_ramp_to_value_at_time(0.2, 1.05).unwrap();

    gain.cancel_scheduled_values(1.02);
    assert_eq!(gain.events().len(), 1);
    // The unfinished ramp is gone, so the level holds its last set value.
    assert_eq!(gain.value_at(1.03), 0.0);
}

#[test]
fn events_at_the_same_time_apply_in_insertion_order() {
    let mut gain = Automation::new(1.0, 0.0);
    gain.set_value_at_time(0.3, 1.0).unwrap();
    gain.set_value_at_time(0.7, 1.0).unwrap();
    assert_eq!(gain.value_at(1.0), 0.7);
}

#[test]
fn prune_keeps_the_current_value() {
    let mut gain = Automation::new(1.0, 0.0);
    gain.set_value_at_time(0.0, 1.0).unwrap();
    gain.linear_ramp_to_value_at_time(0.2, 1.05).unwrap();
    gain.set_value_at_time(0.2, 1.5).unwrap();
    gain.exponential_ramp_to_value_at_time(0.001, 1.7).unwrap();

    let before = gain.value_at(1.6);
    gain.prune_before(1.55);
    assert_eq!(gain.events().len(), 1);
    assert_close(f64::from(gain.value_at(1.6)), f64::from(before), 1e-7);
}

use rustkeysynth::synth::{EnvelopeState, KeyId, Voice, VoiceRegistry};

fn voice(code: u32, tag: &'static str) -> Voice<&'static str, ()> {
    Voice::new(KeyId(code), 440.0, 1.0, 0.05, tag, ())
}

#[test]
fn insert_then_has_and_remove() {
    let mut registry = VoiceRegistry::new();
    assert!(!registry.has(KeyId(90)));
    assert!(registry.is_empty());

    assert!(registry.insert(voice(90, "first")).is_ok());
    assert!(registry.has(KeyId(90)));
    assert_eq!(registry.len(), 1);

    let removed = registry.remove(KeyId(90)).expect("voice should be present");
    assert_eq!(removed.tone, "first");
    assert!(!registry.has(KeyId(90)));
}

#[test]
fn second_insert_for_a_held_key_is_rejected() {
    let mut registry = VoiceRegistry::new();
    registry.insert(voice(90, "first")).unwrap();

    let rejected = registry
        .insert(voice(90, "second"))
        .expect_err("key 90 is already sounding");
    assert_eq!(rejected.tone, "second");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get(KeyId(90)).map(|v| v.tone), Some("first"));
}

#[test]
fn removing_an_absent_key_is_not_an_error() {
    let mut registry: VoiceRegistry<&'static str, ()> = VoiceRegistry::new();
    assert!(registry.remove(KeyId(90)).is_none());

    registry.insert(voice(90, "only")).unwrap();
    assert!(registry.remove(KeyId(90)).is_some());
    assert!(registry.remove(KeyId(90)).is_none());
}

#[test]
fn keys_are_independent() {
    let mut registry = VoiceRegistry::new();
    registry.insert(voice(90, "c")).unwrap();
    registry.insert(voice(78, "a")).unwrap();

    let mut keys: Vec<KeyId> = registry.keys().collect();
    keys.sort();
    assert_eq!(keys, vec![KeyId(78), KeyId(90)]);

    registry.remove(KeyId(90));
    assert!(registry.has(KeyId(78)));
}

#[test]
fn refresh_moves_attack_to_sustain() {
    let mut registry = VoiceRegistry::new();
    registry.insert(voice(90, "c")).unwrap();

    registry.refresh(1.02);
    assert_eq!(
        registry.get(KeyId(90)).map(|v| v.state()),
        Some(EnvelopeState::Attacking)
    );

    registry.refresh(1.06);
    assert_eq!(
        registry.get(KeyId(90)).map(|v| v.state()),
        Some(EnvelopeState::Sustained)
    );
}

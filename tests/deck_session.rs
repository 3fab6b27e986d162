use std::path::Path;

use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;

use cuedeck::audio_api::AudioCommand;
use cuedeck::config::{self, ClipSource, DeckConfig};
use cuedeck::shared::{Ignored, InputEvent, Outcome};
use cuedeck::sonification::{AlertKind, PresetState};
use cuedeck::transport::TransportState;
use cuedeck::{DeckError, Middle};

fn deck_with_tracks(lengths: &[f32]) -> Middle {
    let mut config = DeckConfig::default();
    config.transport.tracks = lengths.iter().map(|l| ClipSource::silent(*l)).collect();
    Middle::from_config(&config, Path::new("."), 44100, None).unwrap().middle
}

fn run_for(middle: &mut Middle, seconds: u32) {
    for _ in 0..seconds * 10 {
        middle.tick(0.1);
    }
}

#[test]
fn a_session_through_both_boards() {
    let mut m = deck_with_tracks(&[8.0, 60.0, 60.0, 60.0]);

    m.handle_input(InputEvent::Play);
    run_for(&mut m, 5); // cue delay
    run_for(&mut m, 3);
    let ds = m.display_state();
    assert_eq!(ds.transport.state, TransportState::Playing);
    assert_abs_diff_eq!(ds.transport.position, 3.0, epsilon = 0.05);

    // track 1 is 60s so 3s carries over
    m.handle_input(InputEvent::Next);
    let ds = m.display_state();
    assert_eq!(ds.transport.track_index, 1);
    assert_abs_diff_eq!(ds.transport.position, 3.0, epsilon = 0.05);

    m.handle_input(InputEvent::TriggerAlert(AlertKind::Lie));
    let ds = m.display_state();
    assert_eq!(ds.detector.preset, Some(PresetState::ExcitedFalse));
    assert!(ds.detector.alert_active);
    // the alert's preset takes the track down
    assert_eq!(ds.transport.state, TransportState::Stopped);
    assert!(!ds.transport.sounding);

    m.handle_input(InputEvent::Play);
    run_for(&mut m, 6);
    assert!(m.display_state().transport.sounding);

    m.handle_input(InputEvent::StopAlertsOnly);
    assert!(m.display_state().detector.pulse.playing);

    m.handle_input(InputEvent::StopAll);
    run_for(&mut m, 1);
    let ds = m.display_state();
    assert!(!ds.detector.pulse.playing);
    assert!(!ds.detector.respiration.playing);
    assert_eq!(ds.detector.progress, 0.0);
    assert!(!ds.transport.sounding);
    assert_eq!(ds.transport.state, TransportState::Stopped);
    assert_eq!(ds.transport.track_index, 1);
    assert_abs_diff_eq!(ds.transport.position, 4.0, epsilon = 0.05);
}

#[test]
fn wrapping_next_drops_a_position_the_first_track_cannot_hold() {
    let mut m = deck_with_tracks(&[8.0, 60.0, 60.0, 60.0]);
    m.handle_input(InputEvent::Previous); // to track 3 at 0s
    run_for(&mut m, 5);
    run_for(&mut m, 10);
    assert_eq!(m.display_state().transport.track_index, 3);

    m.handle_input(InputEvent::Next);
    let ds = m.display_state();
    assert_eq!(ds.transport.track_index, 0);
    assert_eq!(ds.transport.position, 0.0);
}

#[test]
fn fast_forward_to_the_end_comes_back_at_normal_speed() {
    let mut m = deck_with_tracks(&[12.0, 60.0, 60.0, 60.0]);
    m.handle_input(InputEvent::FastForward);
    assert_eq!(m.display_state().transport.pitch, 3.0);
    run_for(&mut m, 5);
    run_for(&mut m, 5); // 15s of track at 3x

    let ds = m.display_state();
    assert_eq!(ds.transport.state, TransportState::Playing);
    assert_eq!(ds.transport.pitch, 1.0);
    assert!(ds.transport.position < 12.0);
}

#[test]
fn play_while_busy_is_refused_without_side_effects() {
    let mut m = deck_with_tracks(&[60.0]);
    m.handle_input(InputEvent::Play);
    let before = m.display_state().transport;
    assert_eq!(m.handle_input(InputEvent::Play), Outcome::Ignored(Ignored::Busy));
    assert_eq!(m.display_state().transport, before);
}

#[test]
fn config_on_disk_drives_the_deck() {
    let dir = tempfile::tempdir().unwrap();
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 22050,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(dir.path().join("click.wav"), spec).unwrap();
    for _ in 0..22050 {
        writer.write_sample(0.1f32).unwrap();
        writer.write_sample(-0.1f32).unwrap();
    }
    writer.finalize().unwrap();

    std::fs::write(
        config::config_file_path(dir.path()),
        r#"{
            "transport": {
                "cue_delay_secs": 1.0,
                "tracks": [{ "length_secs": 30 }, { "length_secs": 40 }],
                "cues": { "play": { "path": "click.wav" } }
            }
        }"#,
    )
    .unwrap();

    let config = config::load_config(dir.path()).unwrap();
    let deck = Middle::from_config(&config, dir.path(), 44100, None).unwrap();
    assert_eq!(deck.registrations.len(), 1);
    assert!(matches!(deck.registrations[0], AudioCommand::RegisterClip { .. }));

    let mut m = deck.middle;
    assert_eq!(m.display_state().transport.track_count, 2);
    m.handle_input(InputEvent::Play);
    run_for(&mut m, 2);
    assert!(m.display_state().transport.sounding);
}

#[test]
fn bad_presets_stop_the_deck_from_building() {
    let mut config = DeckConfig::default();
    config.presets.calm.pulse_volume = 0.9;
    let err = Middle::from_config(&config, Path::new("."), 44100, None).err().unwrap();
    assert!(matches!(err, DeckError::InvalidPreset(_)));
}

#[test]
fn an_empty_track_list_is_rejected() {
    let mut config = DeckConfig::default();
    config.transport.tracks.clear();
    let err = Middle::from_config(&config, Path::new("."), 44100, None).err().unwrap();
    assert!(matches!(err, DeckError::EmptyTrackSet));
}

use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crate::shared::InputEvent;
use crate::sonification::{AlertKind, AmbientChannel, PresetState};
use super::mode::TuiState;

const PITCH_STEP: f32 = 0.05;
const VOLUME_STEP: f32 = 0.05;
const CONFIDENCE_STEP: f32 = 0.05;

// poll for input from the terminal, resolve key presses into input events for the middle layer
pub fn poll_input(timeout: Duration, ts: &mut TuiState) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key.code, ts));
    }
    Ok(vec![])
}

pub fn handle_key(code: KeyCode, ts: &mut TuiState) -> Vec<InputEvent> {
    match code {
        KeyCode::Esc => vec![InputEvent::Quit],

        // transport
        KeyCode::Char(' ') => vec![InputEvent::Play],
        KeyCode::Char('s') => vec![InputEvent::Stop],
        KeyCode::Char('p') => vec![InputEvent::Pause],
        KeyCode::Char('f') => vec![InputEvent::FastForward],
        KeyCode::Char('n') | KeyCode::Right => vec![InputEvent::Next],
        KeyCode::Char('b') | KeyCode::Left => vec![InputEvent::Previous],
        KeyCode::Char('r') => vec![InputEvent::Reset],
        KeyCode::Char('-') => vec![InputEvent::AdjustTrackVolume(-VOLUME_STEP)],
        KeyCode::Char('=') => vec![InputEvent::AdjustTrackVolume(VOLUME_STEP)],

        // detector presets, one per number key
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            vec![InputEvent::ApplyPreset(PresetState::ALL[idx])]
        }
        KeyCode::Char('t') => vec![InputEvent::TriggerAlert(AlertKind::Truth)],
        KeyCode::Char('l') => vec![InputEvent::TriggerAlert(AlertKind::Lie)],
        KeyCode::Char('g') => vec![InputEvent::TriggerAlert(AlertKind::Gsr)],
        KeyCode::Char('x') => vec![InputEvent::StopAll],
        KeyCode::Char('z') => vec![InputEvent::StopAlertsOnly],
        KeyCode::Char('k') => vec![InputEvent::ToggleGsrControl],
        KeyCode::Char('u') => vec![InputEvent::StartAmbient(AmbientChannel::Pulse)],
        KeyCode::Char('i') => vec![InputEvent::StartAmbient(AmbientChannel::Respiration)],

        // sliders: unshifted = pitch, shifted = volume
        KeyCode::Char('[') => vec![InputEvent::AdjustPitch(AmbientChannel::Pulse, -PITCH_STEP)],
        KeyCode::Char(']') => vec![InputEvent::AdjustPitch(AmbientChannel::Pulse, PITCH_STEP)],
        KeyCode::Char('{') => vec![InputEvent::AdjustVolume(AmbientChannel::Pulse, -VOLUME_STEP)],
        KeyCode::Char('}') => vec![InputEvent::AdjustVolume(AmbientChannel::Pulse, VOLUME_STEP)],
        KeyCode::Char(';') => vec![InputEvent::AdjustPitch(AmbientChannel::Respiration, -PITCH_STEP)],
        KeyCode::Char('\'') => vec![InputEvent::AdjustPitch(AmbientChannel::Respiration, PITCH_STEP)],
        KeyCode::Char(':') => vec![InputEvent::AdjustVolume(AmbientChannel::Respiration, -VOLUME_STEP)],
        KeyCode::Char('"') => vec![InputEvent::AdjustVolume(AmbientChannel::Respiration, VOLUME_STEP)],

        KeyCode::Tab => {
            ts.cycle_focus();
            vec![]
        }
        KeyCode::Char(',') => vec![InputEvent::AdjustConfidence(ts.confidence_focus, -CONFIDENCE_STEP)],
        KeyCode::Char('.') => vec![InputEvent::AdjustConfidence(ts.confidence_focus, CONFIDENCE_STEP)],

        _ => vec![],
    }
}

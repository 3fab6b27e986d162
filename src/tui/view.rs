use crate::shared::DisplayState;
use crate::sonification::{AlertKind, ChannelStatus};
use crate::transport::TransportState;
use super::grid::draw_track_strip;
use super::mode::TuiState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const HELP: &str = "spc play  s stop  p pause  f ff  n/b next/prev  r reset  1-4 preset  t/l/g alert  x stop all  z stop alerts  k gsr  esc quit";

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, ts: &TuiState, blink_on: bool) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // track strip
            Constraint::Length(5), // transport screen
            Constraint::Min(8),    // detector board
            Constraint::Length(1), // notice / help
        ])
        .split(area);

    let t = &state.transport;
    draw_track_strip(frame, sections[0], t.track_count, t.track_index, t.sounding);
    draw_transport(frame, sections[1], state, blink_on);
    draw_detector(frame, sections[2], state, ts);
    draw_footer(frame, sections[3], state);
}

fn draw_transport(frame: &mut Frame, area: Rect, state: &DisplayState, blink_on: bool) {
    let t = &state.transport;
    let state_color = match t.state {
        TransportState::Playing => Color::Green,
        TransportState::FastForwarding => Color::Yellow,
        TransportState::Paused => Color::Cyan,
        TransportState::Stopped => Color::Red,
    };
    // a pending start (cue still ringing) blinks
    let label_style = if t.state != TransportState::Stopped && !t.sounding && !blink_on {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(state_color).add_modifier(Modifier::BOLD)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(t.state.label(), label_style),
            Span::raw(format!("   track {}/{}", t.track_index + 1, t.track_count)),
        ]),
        Line::from(format!(
            "{} / {}   pitch {:.2}x   vol {:.0}%",
            clock(t.position),
            clock(t.duration),
            t.pitch,
            t.volume * 100.0
        )),
        Line::from(format!(
            "cmd #{} {}",
            t.command_seq,
            t.last_command.map_or("-", |op| op.label())
        )),
    ];
    let screen = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("8-Track"));
    frame.render_widget(screen, area);
}

fn draw_detector(frame: &mut Frame, area: Rect, state: &DisplayState, ts: &TuiState) {
    let d = &state.detector;
    let flag = |on: bool, text: &'static str| {
        if on {
            Span::styled(text, Style::default().fg(Color::Black).bg(Color::Yellow))
        } else {
            Span::styled(text, Style::default().fg(Color::DarkGray))
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::raw("preset "),
            Span::styled(
                d.preset.map_or("-", |p| p.label()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("   last alert {}", d.last_alert.map_or("-", |k| k.label()))),
        ]),
        Line::from(vec![
            flag(d.ambient_enabled, " AMBIENT "),
            Span::raw(" "),
            flag(d.alert_active, " ALERT "),
            Span::raw(" "),
            flag(d.gsr_control_enabled, " GSR CTRL "),
            Span::raw(format!("   {:.1}s", d.progress)),
        ]),
        channel_line("pulse", &d.pulse),
        channel_line("resp ", &d.respiration),
    ];

    let confidences: Vec<Span> = AlertKind::ALL
        .iter()
        .flat_map(|kind| {
            let style = if *kind == ts.confidence_focus {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            [
                Span::styled(format!("{} {:.2}", kind.label(), d.confidence.get(*kind)), style),
                Span::raw("  "),
            ]
        })
        .collect();
    lines.push(Line::from(confidences));

    let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Lie Detector"));
    frame.render_widget(board, area);
}

fn channel_line(name: &str, ch: &ChannelStatus) -> Line<'static> {
    let marker = if ch.playing { ">" } else { " " };
    Line::from(format!(
        "{marker} {name}  pitch {:.2}  vol {:.2}  {:.1}s",
        ch.pitch, ch.volume, ch.elapsed
    ))
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let footer = if state.notice.is_empty() {
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(state.notice.as_str()).style(Style::default().fg(Color::Yellow))
    };
    frame.render_widget(footer, area);
}

// m:ss
fn clock(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

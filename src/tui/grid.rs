use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

// one cell per track, the current one lit
pub fn draw_track_strip(frame: &mut Frame, area: Rect, track_count: usize, current: usize, sounding: bool) {
    if track_count == 0 {
        return;
    }
    let col_constraints = vec![Constraint::Ratio(1, track_count as u32); track_count];
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(col_constraints)
        .split(area);

    for (idx, cell_area) in cols.iter().enumerate() {
        let style = match (idx == current, sounding) {
            (true, true) => Style::default().fg(Color::LightMagenta).bg(Color::Magenta),
            (true, false) => Style::default().fg(Color::Magenta),
            _ => Style::default().fg(Color::DarkGray),
        };
        let cell = Paragraph::new(format!("TRACK {}", idx + 1))
            .style(style)
            .block(Block::default().borders(Borders::ALL).border_style(style));
        frame.render_widget(cell, *cell_area);
    }
}

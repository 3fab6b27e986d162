use crate::sonification::AlertKind;

// state local to the tui; the only thing the keys can't say on their own is which
// confidence slider `,` and `.` move
#[derive(Clone, Debug)]
pub struct TuiState {
    pub confidence_focus: AlertKind,
}

impl Default for TuiState {
    fn default() -> Self {
        Self { confidence_focus: AlertKind::Truth }
    }
}

impl TuiState {
    // Tab walks truth -> lie -> gsr -> truth
    pub fn cycle_focus(&mut self) {
        let next = (self.confidence_focus.index() + 1) % AlertKind::COUNT;
        self.confidence_focus = AlertKind::ALL[next];
    }
}

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct StudyLayout {
    pub header_area: Rect,
    pub card_area: Rect,
    pub history_area: Option<Rect>,
    pub status_area: Rect,
    pub help_area: Rect,
}

pub fn calculate_study_chunks(area: Rect, show_history: bool) -> StudyLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let (card_area, history_area) = if show_history {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[1]);
        (body[0], Some(body[1]))
    } else {
        (chunks[1], None)
    };

    StudyLayout {
        header_area: chunks[0],
        card_area: centered_rect(card_area, 80, 80),
        history_area,
        status_area: chunks[2],
        help_area: chunks[3],
    }
}

/// A rectangle taking the given percentages of `area`, centred inside it.
pub fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

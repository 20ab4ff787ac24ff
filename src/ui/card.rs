use crate::models::{CardView, StudyApp};
use crate::ui::layout::calculate_study_chunks;
use crate::utils::{truncate_string, wrapped_height};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, List, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

fn key_span(key: &str) -> Span<'_> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn card_text(view: Option<CardView<'_>>) -> Text<'_> {
    let Some(view) = view else {
        return Text::from(Line::from(Span::styled(
            "Press Space to draw the first card",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    };

    let mut text = Text::default();
    if view.face.shows_label() {
        text.push_line(Line::from(Span::styled(
            view.term.label.as_str(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        if !view.term.abbreviations.is_empty() {
            text.push_line(Line::from(Span::styled(
                format!("({})", view.term.abbreviations.join(", ")),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    if view.face.shows_definition() {
        if view.face.shows_label() {
            text.push_line(Line::from(""));
        }
        text.push_line(Line::from(view.term.definition.as_str()));
    }
    text
}

fn draw_card(f: &mut Frame, area: Rect, study: &StudyApp) {
    let view = study.session.current();
    let title = match view {
        Some(v) if v.face.shows_label() && v.face.shows_definition() => "Term & Definition",
        Some(v) if v.face.shows_definition() => "Definition",
        Some(_) => "Term",
        None => "Card",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = card_text(view);
    let width = inner.width.saturating_sub(2) as usize;
    let content_height: usize = text
        .lines
        .iter()
        .map(|line| {
            let content: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            wrapped_height(&content, width)
        })
        .sum();
    let top_pad = (inner.height as usize).saturating_sub(content_height) / 2;

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(top_pad as u16), Constraint::Min(1)])
        .split(inner);

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::horizontal(1)));
    f.render_widget(paragraph, body[1]);
}

fn draw_history(f: &mut Frame, area: Rect, study: &StudyApp) {
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = study
        .session
        .history()
        .rev()
        .enumerate()
        .map(|(i, term)| {
            let style = if i == 0 {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(truncate_string(&term.display_label(), width)).style(style)
        })
        .collect();

    let history = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("History ({})", study.session.history_len())),
    );
    f.render_widget(history, area);
}

pub fn draw_study(f: &mut Frame, study: &StudyApp) {
    let layout = calculate_study_chunks(f.area(), study.show_history);
    let session = &study.session;

    let header_text = format!(
        "{} - Mode: {} - Shuffle: {} - {} / {} left",
        study.deck_name,
        session.display_mode().name(),
        if session.is_shuffle() { "on" } else { "off" },
        session.remaining_len(),
        session.active_len(),
    );
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    draw_card(f, layout.card_area, study);

    if let Some(history_area) = layout.history_area {
        draw_history(f, history_area, study);
    }

    if let Some(status) = &study.status {
        let status = Paragraph::new(status.as_str())
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        f.render_widget(status, layout.status_area);
    }

    let help_text = vec![Line::from(vec![
        key_span("Space/Enter"),
        Span::from(" Next  "),
        key_span("f"),
        Span::from(" Flip/All  "),
        key_span("s"),
        Span::from(" Shuffle  "),
        key_span("r"),
        Span::from(" Restart  "),
        key_span("h"),
        Span::from(" History  "),
        key_span("Esc"),
        Span::from(" Menu  "),
        key_span("Ctrl+C"),
        Span::from(" Exit"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit to Menu")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Stop studying and return to the deck menu?")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (Return to Menu)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Keep Studying)  "),
        key_span("Ctrl+C"),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Blocking message box. Any key dismisses it.
pub fn render_alert<B: Backend>(frame: &mut Frame<B>, message: &str) {
    let popup_area = centered_rect(60, 25, frame.size());

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(message.to_string()),
        Spans::from(""),
        Spans::from("Pressione qualquer tecla para continuar"),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title("Atenção")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    )
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

pub fn render_confirmation<B: Backend>(frame: &mut Frame<B>, question: &str) {
    let popup_area = centered_rect(50, 20, frame.size());

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(question.to_string()),
        Spans::from(""),
        Spans::from("<Y> Sim  <N> Não"),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().title("Confirmar exclusão").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

pub fn render_loading<B: Backend>(frame: &mut Frame<B>, area: Rect, message: &str) {
    let loading = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(message.to_string()),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(loading, area);
}

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

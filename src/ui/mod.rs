pub mod client_form;
pub mod clients;
pub mod components;

use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{AppScreen, AppState};
use client_form::render_client_form;
use clients::render_clients;
use components::popup::render_alert;

/// Draws the header, the active screen and, on top, any pending alert.
pub fn render_app<B: Backend>(f: &mut Frame<B>, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
        .split(f.size());

    let header = Paragraph::new(Spans::from(vec![
        Span::styled(
            "PetLovers",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Gerenciamento de Clientes"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    match app.screen {
        AppScreen::Clients => render_clients(f, chunks[1], &mut app.clients_state, app.loading),
        AppScreen::ClientForm => {
            if let Some(state) = &mut app.client_form_state {
                render_client_form(f, chunks[1], state);
            }
        }
    }

    if let Some(message) = &app.alert {
        render_alert(f, message);
    }
}

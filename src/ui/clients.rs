use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::api::{ApiClient, ApiError};
use crate::format::{cpf_digits, format_cpf, format_location, format_phones, format_timestamp};
use crate::models::Client;
use crate::ui::components::popup::{render_confirmation, render_loading};

// Represents the state of the client list screen
pub struct ClientsState {
    clients: Vec<Client>,
    table_state: TableState,
    search_term: String,
    search_focused: bool,
    show_delete_confirmation: bool,
}

impl ClientsState {
    pub fn new(clients: Vec<Client>) -> Self {
        let mut state = Self {
            clients: Vec::new(),
            table_state: TableState::default(),
            search_term: String::new(),
            search_focused: false,
            show_delete_confirmation: false,
        };
        state.set_clients(clients);
        state
    }

    /// Replaces the rows after a fetch, keeping the cursor where it was when
    /// that row still exists.
    pub fn set_clients(&mut self, clients: Vec<Client>) {
        self.clients = clients;
        let selected = match self.table_state.selected() {
            _ if self.clients.is_empty() => None,
            Some(i) => Some(i.min(self.clients.len() - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn next(&mut self) {
        if self.clients.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= self.clients.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.clients.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.clients.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.show_delete_confirmation
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.table_state.selected().and_then(|i| self.clients.get(i))
    }

    pub fn selected_client_id(&self) -> Option<i64> {
        self.selected_client().map(|c| c.id)
    }

    pub fn client(&self, id: i64) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
    }

    pub fn is_search_focused(&self) -> bool {
        self.search_focused
    }
}

pub enum ClientAction {
    Quit,
    Refresh,
    Search(String),
    NewClient,
    EditClient(i64),
    DeleteClient(i64),
}

/// Display strings for one table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRow {
    pub name: String,
    pub social_name: Option<String>,
    pub email: Option<String>,
    pub cpf: String,
    pub phones: String,
    pub location: String,
    pub registered_at: String,
}

impl ClientRow {
    pub fn from_client(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            social_name: client.social_name.clone().filter(|s| !s.is_empty()),
            email: client.email.clone().filter(|s| !s.is_empty()),
            cpf: format_cpf(&client.cpf),
            phones: format_phones(&client.phones),
            location: format_location(client.address.as_ref()),
            registered_at: client
                .created_at
                .as_deref()
                .map(format_timestamp)
                .unwrap_or_default(),
        }
    }

    fn name_cell(&self) -> Text<'static> {
        let mut lines = vec![Spans::from(Span::styled(
            self.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if let Some(social_name) = &self.social_name {
            lines.push(Spans::from(Span::styled(
                format!("Social: {social_name}"),
                Style::default().fg(Color::Cyan),
            )));
        }
        if let Some(email) = &self.email {
            lines.push(Spans::from(Span::styled(
                format!("Email: {email}"),
                Style::default().fg(Color::Cyan),
            )));
        }
        Text::from(lines)
    }
}

// API operations for clients
pub async fn load_clients(api: &ApiClient, search: &str) -> Result<Vec<Client>, ApiError> {
    let clients = api.list_clients(Some(search)).await?;
    Ok(filter_clients(clients, search))
}

pub async fn delete_client(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    api.delete_client(id).await
}

/// Keeps the clients whose name, social name, email or CPF matches `term`.
///
/// Applied on top of whatever the server returned, so the result is the same
/// whether or not the backend honours the `search` parameter.
pub fn filter_clients(clients: Vec<Client>, term: &str) -> Vec<Client> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return clients;
    }
    // CPF matching only applies to terms that look like a CPF fragment
    let cpf_term = term.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-');
    let term_digits = if cpf_term { cpf_digits(&term) } else { String::new() };

    clients
        .into_iter()
        .filter(|client| {
            let text_match = [
                Some(client.name.as_str()),
                client.social_name.as_deref(),
                client.email.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(&term));

            text_match || (!term_digits.is_empty() && cpf_digits(&client.cpf).contains(&term_digits))
        })
        .collect()
}

pub fn render_clients<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut ClientsState, loading: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ].as_ref())
        .split(area);

    render_search(frame, chunks[0], state);

    if loading {
        render_loading(frame, chunks[1], "Carregando clientes...");
    } else if state.clients.is_empty() {
        render_empty(frame, chunks[1], state);
    } else {
        render_table(frame, chunks[1], state);
    }

    // Create and render the buttons
    let buttons_text = if state.search_focused {
        "Digite para buscar | <Enter>/<Esc> Sair da busca"
    } else if state.selected_client().is_some() {
        "</> Buscar | <N> Novo Cliente | <E> Editar | <D> Excluir | <R> Atualizar | <Q> Sair"
    } else {
        "</> Buscar | <N> Novo Cliente | <R> Atualizar | <Q> Sair"
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[2]);

    if state.show_delete_confirmation {
        render_confirmation(frame, "Tem certeza que deseja excluir este cliente?");
    }
}

fn render_search<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &ClientsState) {
    let (text, style) = if state.search_term.is_empty() && !state.search_focused {
        (
            "Buscar por nome, CPF ou email...".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else if state.search_focused {
        (format!("{}|", state.search_term), Style::default().fg(Color::Yellow))
    } else {
        (state.search_term.clone(), Style::default())
    };

    let search = Paragraph::new(text)
        .style(style)
        .block(Block::default().title("Busca").borders(Borders::ALL));
    frame.render_widget(search, area);
}

fn render_empty<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &ClientsState) {
    let hint = if state.search_term.is_empty() {
        "Cadastre seu primeiro cliente"
    } else {
        "Tente ajustar sua busca"
    };

    let empty = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(Span::styled(
            "Nenhum cliente encontrado",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Spans::from(hint),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().title(table_title(0)).borders(Borders::ALL));

    frame.render_widget(empty, area);
}

fn render_table<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut ClientsState) {
    let header_cells = ["Nome", "CPF", "Telefones", "Localização", "Cadastrado em"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells)
        .style(Style::default())
        .height(1)
        .bottom_margin(1);

    let rows = state.clients.iter().map(|client| {
        let row = ClientRow::from_client(client);
        let name = row.name_cell();
        let height = name.height() as u16;

        Row::new(vec![
            Cell::from(name),
            Cell::from(row.cpf),
            Cell::from(row.phones),
            Cell::from(row.location),
            Cell::from(row.registered_at),
        ])
        .height(height)
    });

    let table = Table::new(rows)
        .header(header)
        .block(
            Block::default()
                .title(table_title(state.clients.len()))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&[
            Constraint::Percentage(30),
            Constraint::Percentage(15),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
        ]);

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

fn table_title(total: usize) -> String {
    format!("Clientes Cadastrados (Total: {total} clientes)")
}

pub fn handle_key(state: &mut ClientsState, key: KeyCode) -> Option<ClientAction> {
    if state.show_delete_confirmation {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                state.toggle_delete_confirmation();
                return state.selected_client_id().map(ClientAction::DeleteClient);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.toggle_delete_confirmation();
            }
            _ => {}
        }
        return None;
    }

    if state.search_focused {
        match key {
            KeyCode::Enter | KeyCode::Esc => {
                state.search_focused = false;
            }
            KeyCode::Char(c) => {
                state.search_term.push(c);
                return Some(ClientAction::Search(state.search_term.clone()));
            }
            KeyCode::Backspace => {
                if state.search_term.pop().is_some() {
                    return Some(ClientAction::Search(state.search_term.clone()));
                }
            }
            _ => {}
        }
        return None;
    }

    match key {
        KeyCode::Char('q') => return Some(ClientAction::Quit),
        KeyCode::Char('/') => state.search_focused = true,
        KeyCode::Char('n') => return Some(ClientAction::NewClient),
        KeyCode::Char('r') => return Some(ClientAction::Refresh),
        KeyCode::Char('e') | KeyCode::Enter => {
            return state.selected_client_id().map(ClientAction::EditClient);
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if state.selected_client().is_some() {
                state.toggle_delete_confirmation();
            }
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}

use crossterm::event::KeyCode;
use tracing::{error, info};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::api::ApiClient;
use crate::format::{format_cpf_input, CPF_MASK_LEN};
use crate::models::{AddressField, Client, ClientDraft, FormField, PhoneDraft, PhonePart};
use crate::validation::{conflict_field, validate, FormErrors};

pub enum FormAction {
    Cancel,
    Submit,
}

/// Result of a submit attempt, as seen by the root screen.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The backend accepted the record.
    Saved(Client),
    /// Errors were attached to fields; the form stays open.
    Rejected,
    /// Anything that could not be tied to a field. Shown as an alert.
    Failed(String),
}

pub struct ClientFormState {
    pub draft: ClientDraft,
    pub errors: FormErrors,
    pub current: usize,
    pub editing: bool,
    pub submitting: bool,
}

impl ClientFormState {
    pub fn new() -> Self {
        Self::with_draft(ClientDraft::new())
    }

    pub fn from_existing(client: &Client) -> Self {
        Self::with_draft(ClientDraft::from_client(client))
    }

    fn with_draft(draft: ClientDraft) -> Self {
        Self {
            draft,
            errors: FormErrors::default(),
            current: 0,
            editing: false,
            submitting: false,
        }
    }

    /// Inputs in display order. Phone rows make the list grow and shrink.
    pub fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Name,
            FormField::SocialName,
            FormField::Email,
            FormField::Cpf,
        ];
        fields.extend(AddressField::ALL.into_iter().map(FormField::Address));
        for index in 0..self.draft.phones.len() {
            fields.push(FormField::Phone(index, PhonePart::AreaCode));
            fields.push(FormField::Phone(index, PhonePart::Number));
        }
        fields
    }

    pub fn current_field(&self) -> FormField {
        let fields = self.fields();
        fields[self.current.min(fields.len() - 1)]
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        let len = self.fields().len();
        self.current = (self.current + 1) % len;
    }

    pub fn previous_field(&mut self) {
        let len = self.fields().len();
        self.current = (self.current + len - 1) % len;
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field = self.current_field();
        let Some(value) = self.draft.get_mut(field) else {
            return;
        };

        match key {
            KeyCode::Char(c) => {
                if field == FormField::Cpf && value.chars().count() >= CPF_MASK_LEN {
                    return;
                }
                value.push(c);
            }
            KeyCode::Backspace => {
                value.pop();
            }
            _ => return,
        }

        if field == FormField::Cpf {
            *value = format_cpf_input(value);
        }
        self.errors.clear(field);
    }

    pub fn add_phone(&mut self) {
        self.draft.phones.push(PhoneDraft::default());
        let fields = self.fields();
        self.current = fields.len() - 2;
    }

    /// Removes the phone row under the cursor. The last row always stays.
    pub fn remove_current_phone(&mut self) {
        let FormField::Phone(index, _) = self.current_field() else {
            return;
        };
        if self.draft.phones.len() <= 1 {
            return;
        }

        self.draft.phones.remove(index);
        self.errors.remove_phone(index);
        self.current = self.current.min(self.fields().len() - 1);
    }

    /// Runs validation, replacing the previous errors. Moves the cursor to
    /// the first failing input.
    pub fn validate(&mut self) -> bool {
        self.errors = validate(&self.draft);
        if let Some(position) = self
            .fields()
            .iter()
            .position(|field| self.errors.get(*field).is_some())
        {
            self.current = position;
        }
        self.errors.is_empty()
    }

    /// Attaches a message to `field` and moves the cursor onto it.
    pub fn reject_field(&mut self, field: FormField, message: String) {
        self.errors.insert(field, message);
        if let Some(position) = self.fields().iter().position(|f| *f == field) {
            self.current = position;
        }
    }

    pub fn title(&self) -> &'static str {
        if self.draft.is_new() {
            "Cadastrar Novo Cliente"
        } else {
            "Editar Cliente"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Salvando..."
        } else if self.draft.is_new() {
            "Cadastrar Cliente"
        } else {
            "Atualizar Cliente"
        }
    }
}

impl Default for ClientFormState {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates and sends the draft, creating or updating depending on whether
/// it carries an id.
///
/// A backend rejection mentioning a known field ends up as that field's
/// error; every other failure comes back as [`SubmitOutcome::Failed`].
pub async fn submit_client(api: &ApiClient, state: &mut ClientFormState) -> SubmitOutcome {
    if !state.validate() {
        state.submitting = false;
        return SubmitOutcome::Rejected;
    }

    state.submitting = true;
    let payload = state.draft.to_payload();
    let result = match payload.id {
        Some(_) => api.update_client(&payload).await,
        None => api.create_client(&payload).await,
    };
    state.submitting = false;

    match result {
        Ok(client) => {
            info!(id = client.id, "client saved");
            SubmitOutcome::Saved(client)
        }
        Err(err) => {
            error!(error = %err, "failed to save client");
            match err.server_message() {
                Some(message) => match conflict_field(&message) {
                    Some(field) => {
                        state.reject_field(field, message);
                        SubmitOutcome::Rejected
                    }
                    None => SubmitOutcome::Failed(message),
                },
                None => SubmitOutcome::Failed("Erro ao salvar cliente".to_string()),
            }
        }
    }
}

pub fn render_client_form<B: Backend>(f: &mut Frame<B>, area: Rect, state: &mut ClientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let title = Paragraph::new(state.title())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let help_text = if state.submitting {
        "Enviando...".to_string()
    } else if state.editing {
        "Enter/Esc - Concluir campo".to_string()
    } else {
        format!(
            "Enter - Editar campo | Up/Down - Navegar | + / - Telefone | S - {} | Esc - Cancelar",
            state.submit_label()
        )
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &mut ClientFormState, area: Rect) {
    let current = state.current_field();
    let fields = state.fields();

    let items: Vec<ListItem> = fields
        .iter()
        .map(|field| {
            let focused = *field == current;
            let value = state.draft.get(*field);
            let label_style = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };

            let mut spans = vec![Span::styled(format!("{}: ", field.label()), label_style)];
            if focused && state.editing {
                spans.push(Span::styled(
                    format!("{value}|"),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else if *field == FormField::Cpf && value.is_empty() {
                spans.push(Span::styled("000.000.000-00", Style::default().fg(Color::DarkGray)));
            } else {
                spans.push(Span::raw(value.to_string()));
            }

            let mut lines = vec![Spans::from(spans)];
            if let Some(message) = error_for(state, *field) {
                lines.push(Spans::from(Span::styled(
                    format!("  {message}"),
                    Style::default().fg(Color::Red),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Dados do Cliente"))
        .highlight_style(Style::default().fg(Color::Yellow));

    let mut list_state = ListState::default();
    list_state.select(fields.iter().position(|field| *field == current));
    f.render_stateful_widget(form_list, area, &mut list_state);
}

// Phone row errors are shown once, under the number input.
fn error_for(state: &ClientFormState, field: FormField) -> Option<&str> {
    match field {
        FormField::Phone(_, PhonePart::AreaCode) => None,
        field => state.errors.get(field),
    }
}

pub fn handle_key(state: &mut ClientFormState, key: KeyCode) -> Option<FormAction> {
    if state.submitting {
        return None;
    }

    if state.editing {
        match key {
            KeyCode::Enter | KeyCode::Esc => state.toggle_editing(),
            KeyCode::Tab => state.next_field(),
            KeyCode::BackTab => state.previous_field(),
            _ => state.edit_current_field(key),
        }
        return None;
    }

    match key {
        KeyCode::Esc => return Some(FormAction::Cancel),
        KeyCode::Enter => state.toggle_editing(),
        KeyCode::Up | KeyCode::BackTab => state.previous_field(),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Char('s') => return Some(FormAction::Submit),
        KeyCode::Char('+') => state.add_phone(),
        KeyCode::Char('-') => state.remove_current_phone(),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock;

    fn type_into(state: &mut ClientFormState, field: FormField, text: &str) {
        state.current = state.fields().iter().position(|f| *f == field).unwrap();
        state.editing = true;
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
        state.editing = false;
    }

    fn filled_form(cpf: &str, email: &str) -> ClientFormState {
        let mut state = ClientFormState::new();
        type_into(&mut state, FormField::Name, "Rafael Nunes");
        type_into(&mut state, FormField::Email, email);
        type_into(&mut state, FormField::Cpf, cpf);
        for (field, value) in [
            (AddressField::State, "PR"),
            (AddressField::City, "Curitiba"),
            (AddressField::Neighborhood, "Batel"),
            (AddressField::Street, "Rua Bispo Dom José"),
            (AddressField::Number, "12"),
            (AddressField::PostalCode, "80440-080"),
        ] {
            type_into(&mut state, FormField::Address(field), value);
        }
        type_into(&mut state, FormField::Phone(0, PhonePart::AreaCode), "41");
        type_into(&mut state, FormField::Phone(0, PhonePart::Number), "999887766");
        state
    }

    #[test]
    fn cpf_is_masked_while_typing() {
        let mut state = ClientFormState::new();
        type_into(&mut state, FormField::Cpf, "1234567890123");
        assert_eq!(state.draft.cpf, "123.456.789-01");

        state.editing = true;
        handle_key(&mut state, KeyCode::Backspace);
        assert_eq!(state.draft.cpf, "123.456.789-0");
        handle_key(&mut state, KeyCode::Backspace);
        assert_eq!(state.draft.cpf, "123.456.789");
    }

    #[test]
    fn editing_clears_the_field_error() {
        let mut state = ClientFormState::new();
        assert!(!state.validate());
        assert!(state.errors.get(FormField::Name).is_some());
        assert_eq!(state.current_field(), FormField::Name);

        type_into(&mut state, FormField::Name, "R");
        assert!(state.errors.get(FormField::Name).is_none());
        assert!(state.errors.get(FormField::Cpf).is_some());
    }

    #[test]
    fn navigation_wraps() {
        let mut state = ClientFormState::new();
        handle_key(&mut state, KeyCode::Up);
        assert_eq!(state.current_field(), FormField::Phone(0, PhonePart::Number));
        handle_key(&mut state, KeyCode::Down);
        assert_eq!(state.current_field(), FormField::Name);
    }

    #[test]
    fn phone_rows_can_be_added_and_removed() {
        let mut state = ClientFormState::new();
        handle_key(&mut state, KeyCode::Char('+'));
        assert_eq!(state.draft.phones.len(), 2);
        assert_eq!(state.current_field(), FormField::Phone(1, PhonePart::AreaCode));

        handle_key(&mut state, KeyCode::Char('-'));
        assert_eq!(state.draft.phones.len(), 1);

        // the last row cannot go
        state.current = state.fields().len() - 1;
        handle_key(&mut state, KeyCode::Char('-'));
        assert_eq!(state.draft.phones.len(), 1);
    }

    #[test]
    fn remove_is_ignored_outside_phone_rows() {
        let mut state = ClientFormState::new();
        handle_key(&mut state, KeyCode::Char('+'));
        state.current = 0;
        handle_key(&mut state, KeyCode::Char('-'));
        assert_eq!(state.draft.phones.len(), 2);
    }

    #[test]
    fn keys_are_ignored_while_submitting() {
        let mut state = ClientFormState::new();
        state.submitting = true;
        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert!(handle_key(&mut state, KeyCode::Esc).is_none());
    }

    #[test]
    fn labels_follow_mode() {
        let state = ClientFormState::new();
        assert_eq!(state.title(), "Cadastrar Novo Cliente");
        assert_eq!(state.submit_label(), "Cadastrar Cliente");

        let mut state = filled_form("12345678901", "");
        state.draft.id = Some(4);
        assert_eq!(state.title(), "Editar Cliente");
        assert_eq!(state.submit_label(), "Atualizar Cliente");
    }

    #[tokio::test]
    async fn invalid_draft_is_not_sent() {
        // nothing listens here, so any request would fail the test
        let api = ApiClient::new(&mock::unreachable_url());
        let mut state = ClientFormState::new();

        let outcome = submit_client(&api, &mut state).await;
        assert!(matches!(outcome, SubmitOutcome::Rejected));
        assert!(!state.errors.is_empty());
    }

    #[tokio::test]
    async fn create_then_update() {
        let api = ApiClient::new(&mock::spawn().await);

        let mut state = filled_form("123.456.789-01", "rafael@petlovers.com");
        handle_key(&mut state, KeyCode::Char('+'));
        let created = match submit_client(&api, &mut state).await {
            SubmitOutcome::Saved(client) => client,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert_eq!(created.cpf, "12345678901");
        assert_eq!(created.phones.len(), 1);
        assert!(!state.submitting);

        let mut state = ClientFormState::from_existing(&created);
        type_into(&mut state, FormField::SocialName, "Rafa");
        let updated = match submit_client(&api, &mut state).await {
            SubmitOutcome::Saved(client) => client,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.social_name.as_deref(), Some("Rafa"));
        assert_eq!(api.list_clients(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_cpf_lands_on_the_cpf_field() {
        let api = ApiClient::new(&mock::spawn().await);
        let mut first = filled_form("12345678901", "");
        assert!(matches!(submit_client(&api, &mut first).await, SubmitOutcome::Saved(_)));

        let mut second = filled_form("12345678901", "");
        let outcome = submit_client(&api, &mut second).await;
        assert!(matches!(outcome, SubmitOutcome::Rejected));
        assert_eq!(second.errors.get(FormField::Cpf), Some("CPF já cadastrado"));
        assert_eq!(second.current_field(), FormField::Cpf);
    }

    #[tokio::test]
    async fn duplicate_email_lands_on_the_email_field() {
        let api = ApiClient::new(&mock::spawn().await);
        let mut first = filled_form("12345678901", "dup@petlovers.com");
        assert!(matches!(submit_client(&api, &mut first).await, SubmitOutcome::Saved(_)));

        let mut second = filled_form("98765432100", "dup@petlovers.com");
        let outcome = submit_client(&api, &mut second).await;
        assert!(matches!(outcome, SubmitOutcome::Rejected));
        assert_eq!(second.errors.get(FormField::Email), Some("Email já cadastrado"));
        assert_eq!(second.current_field(), FormField::Email);
    }

    #[tokio::test]
    async fn transport_failure_becomes_an_alert() {
        let api = ApiClient::new(&mock::unreachable_url());
        let mut state = filled_form("12345678901", "");

        match submit_client(&api, &mut state).await {
            SubmitOutcome::Failed(message) => assert_eq!(message, "Erro ao salvar cliente"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!state.submitting);
    }
}

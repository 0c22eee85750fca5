use crossterm::event::KeyCode;
use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::ui::{
    client_form::{handle_key as handle_form_key, submit_client, ClientFormState, FormAction, SubmitOutcome},
    clients::{delete_client, handle_key as handle_clients_key, load_clients, ClientAction, ClientsState},
};

// Represents the current screen in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Clients,
    ClientForm,
}

/// Network work queued by a key press. The loop draws once before running it
/// so the loading and submitting states are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Fetch,
    Edit(i64),
    Delete(i64),
    Submit,
}

// Main application state
pub struct AppState {
    api: ApiClient,
    pub screen: AppScreen,
    pub clients_state: ClientsState,
    pub client_form_state: Option<ClientFormState>,
    pub search_term: String,
    pub loading: bool,
    pub alert: Option<String>,
    pending: Option<Pending>,
}

impl AppState {
    /// Starts on the client list with the first fetch already queued.
    pub fn new(api: ApiClient, initial_search: Option<String>) -> Self {
        let search_term = initial_search.unwrap_or_default();
        let mut clients_state = ClientsState::new(Vec::new());
        clients_state.set_search_term(&search_term);

        Self {
            api,
            screen: AppScreen::Clients,
            clients_state,
            client_form_state: None,
            search_term,
            loading: true,
            alert: None,
            pending: Some(Pending::Fetch),
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    /// Re-fetches with the current search term.
    pub fn refresh(&mut self) {
        self.loading = true;
        self.pending = Some(Pending::Fetch);
    }

    pub fn search(&mut self, term: String) {
        self.search_term = term;
        self.refresh();
    }

    /// Handles one key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        if self.alert.is_some() {
            self.alert = None;
            return false;
        }
        if self.pending.is_some() {
            return false;
        }

        match self.screen {
            AppScreen::Clients => self.handle_clients_screen(key),
            AppScreen::ClientForm => {
                self.handle_client_form_screen(key);
                false
            }
        }
    }

    fn handle_clients_screen(&mut self, key: KeyCode) -> bool {
        match handle_clients_key(&mut self.clients_state, key) {
            Some(ClientAction::Quit) => return true,
            Some(ClientAction::Refresh) => self.refresh(),
            Some(ClientAction::Search(term)) => self.search(term),
            Some(ClientAction::NewClient) => {
                self.client_form_state = Some(ClientFormState::new());
                self.screen = AppScreen::ClientForm;
            }
            Some(ClientAction::EditClient(id)) => self.pending = Some(Pending::Edit(id)),
            Some(ClientAction::DeleteClient(id)) => self.pending = Some(Pending::Delete(id)),
            None => {}
        }
        false
    }

    fn handle_client_form_screen(&mut self, key: KeyCode) {
        let Some(state) = &mut self.client_form_state else {
            self.screen = AppScreen::Clients;
            return;
        };

        match handle_form_key(state, key) {
            Some(FormAction::Cancel) => {
                self.client_form_state = None;
                self.screen = AppScreen::Clients;
            }
            Some(FormAction::Submit) => {
                if state.validate() {
                    state.submitting = true;
                    self.pending = Some(Pending::Submit);
                }
            }
            None => {}
        }
    }

    /// Runs the queued request, if any.
    pub async fn run_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending {
            Pending::Fetch => self.fetch().await,
            Pending::Edit(id) => self.open_editor(id).await,
            Pending::Delete(id) => self.delete(id).await,
            Pending::Submit => self.submit().await,
        }
    }

    async fn fetch(&mut self) {
        self.loading = true;
        match load_clients(&self.api, &self.search_term).await {
            Ok(clients) => {
                info!(count = clients.len(), search = %self.search_term, "clients loaded");
                self.clients_state.set_clients(clients);
            }
            Err(err) => {
                error!(error = %err, "failed to load clients");
                self.alert = Some("Erro ao carregar clientes".to_string());
            }
        }
        self.loading = false;
    }

    async fn open_editor(&mut self, id: i64) {
        let state = match self.api.get_client(id).await {
            Ok(client) => ClientFormState::from_existing(&client),
            Err(err) => {
                warn!(id, error = %err, "falling back to the listed record");
                match self.clients_state.client(id) {
                    Some(client) => ClientFormState::from_existing(client),
                    None => {
                        self.alert = Some("Erro ao carregar cliente".to_string());
                        return;
                    }
                }
            }
        };

        self.client_form_state = Some(state);
        self.screen = AppScreen::ClientForm;
    }

    async fn delete(&mut self, id: i64) {
        match delete_client(&self.api, id).await {
            Ok(()) => {
                info!(id, "client deleted");
                self.refresh();
            }
            Err(err) => {
                error!(id, error = %err, "failed to delete client");
                self.alert = Some("Erro ao deletar cliente".to_string());
            }
        }
    }

    async fn submit(&mut self) {
        let Some(state) = &mut self.client_form_state else {
            return;
        };

        match submit_client(&self.api, state).await {
            SubmitOutcome::Saved(_) => {
                self.client_form_state = None;
                self.screen = AppScreen::Clients;
                self.refresh();
            }
            SubmitOutcome::Rejected => {}
            SubmitOutcome::Failed(message) => self.alert = Some(message),
        }
    }
}

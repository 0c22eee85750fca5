//! In-process stand-in for the registry backend, used by tests.
//!
//! Serves the same five routes under `/cliente` from an in-memory map and
//! rejects duplicate CPFs and emails the way the real service does.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::RwLock};

use crate::models::{Client, ClientPayload, Phone};

const TIMESTAMP: &str = "2025-03-10T14:30:00";

#[derive(Default)]
pub struct Store {
    next_id: i64,
    clients: BTreeMap<i64, Client>,
}

pub type Db = Arc<RwLock<Store>>;

type Rejection = (StatusCode, Json<Value>);

#[derive(Deserialize)]
struct SearchParams {
    search: Option<String>,
}

#[derive(Deserialize)]
struct DeleteBody {
    id: i64,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/cliente/clientes", get(list_clients))
        .route("/cliente/cadastrar", post(create_client))
        .route("/cliente/atualizar", put(update_client))
        .route("/cliente/excluir", delete(delete_client))
        .route("/cliente/{id}", get(get_client))
        .with_state(db)
}

/// Serves the mock on a random local port and returns its base URL.
pub async fn spawn() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app()).await });
    format!("http://{addr}/cliente")
}

/// A base URL nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/cliente")
}

fn reject(status: StatusCode, message: &str) -> Rejection {
    (status, Json(json!({ "error": message })))
}

async fn list_clients(
    State(db): State<Db>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Client>> {
    let store = db.read().await;
    let term = params.search.unwrap_or_default().to_lowercase();
    Json(
        store
            .clients
            .values()
            .filter(|c| term.is_empty() || c.name.to_lowercase().contains(&term))
            .cloned()
            .collect(),
    )
}

async fn get_client(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Client>, Rejection> {
    let store = db.read().await;
    store
        .clients
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Cliente não encontrado"))
}

async fn create_client(
    State(db): State<Db>,
    Json(input): Json<ClientPayload>,
) -> Result<(StatusCode, Json<Client>), Rejection> {
    let mut store = db.write().await;
    check_unique(&store, &input, None)?;

    store.next_id += 1;
    let id = store.next_id;
    let client = to_client(id, input, TIMESTAMP.to_string());
    store.clients.insert(id, client.clone());
    Ok((StatusCode::CREATED, Json(client)))
}

async fn update_client(
    State(db): State<Db>,
    Json(input): Json<ClientPayload>,
) -> Result<Json<Client>, Rejection> {
    let mut store = db.write().await;
    let id = input
        .id
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "ID é obrigatório"))?;
    let created_at = store
        .clients
        .get(&id)
        .and_then(|c| c.created_at.clone())
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Cliente não encontrado"))?;
    check_unique(&store, &input, Some(id))?;

    let client = to_client(id, input, created_at);
    store.clients.insert(id, client.clone());
    Ok(Json(client))
}

async fn delete_client(
    State(db): State<Db>,
    Json(input): Json<DeleteBody>,
) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    store
        .clients
        .remove(&input.id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Cliente não encontrado"))
}

fn check_unique(store: &Store, input: &ClientPayload, own_id: Option<i64>) -> Result<(), Rejection> {
    let others = store.clients.values().filter(|c| Some(c.id) != own_id);
    for other in others {
        if other.cpf == input.cpf {
            return Err(reject(StatusCode::BAD_REQUEST, "CPF já cadastrado"));
        }
        if input.email.is_some() && other.email == input.email {
            return Err(reject(StatusCode::BAD_REQUEST, "Email já cadastrado"));
        }
    }
    Ok(())
}

fn to_client(id: i64, input: ClientPayload, created_at: String) -> Client {
    let phones = input
        .phones
        .into_iter()
        .enumerate()
        .map(|(i, phone)| Phone {
            id: phone.id.or(Some(i as i64 + 1)),
            ..phone
        })
        .collect();

    Client {
        id,
        name: input.name,
        social_name: input.social_name,
        email: input.email,
        cpf: input.cpf,
        address: Some(input.address),
        phones,
        created_at: Some(created_at),
        updated_at: Some(TIMESTAMP.to_string()),
    }
}

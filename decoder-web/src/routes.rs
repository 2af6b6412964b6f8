//! Rotas HTTP e WebSocket do servidor

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use decoder_core::{
    dump::demo_dump, parse_dump, report_unmatched, rules::describe_rules, DecodeEvent, Decoder,
    TokenFeatures, TokenReport,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Estado compartilhado da aplicação
pub struct AppState {
    pub decoder: Decoder,
    /// Pausa entre eventos enviados pelo WebSocket
    pub stream_delay: Duration,
}

#[derive(Deserialize)]
struct FeaturesRequest {
    features: Vec<String>,
}

#[derive(Deserialize)]
struct ReportRequest {
    tokens: Vec<TokenFeatures>,
}

#[derive(Serialize)]
struct ReportResponse {
    reports: Vec<TokenReport>,
    total_tokens: usize,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/decode", post(decode_handler))
        .route("/fielded", post(fielded_handler))
        .route("/report", post(report_handler))
        .route("/rules", get(rules_handler))
        .route("/demo-dump", get(demo_dump_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// Retorna a página principal HTML
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// Decodifica um lote de features cruas
async fn decode_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FeaturesRequest>,
) -> Response {
    if req.features.is_empty() {
        return bad_request("Lista de features vazia");
    }

    let report = state.decoder.decode_report(&req.features);
    for raw in &report.unmatched {
        report_unmatched(None, raw);
    }
    Json(report).into_response()
}

/// Decodifica um lote agrupando por categoria
async fn fielded_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FeaturesRequest>,
) -> Response {
    if req.features.is_empty() {
        return bad_request("Lista de features vazia");
    }
    Json(state.decoder.extract_fielded(&req.features)).into_response()
}

/// Relatório legível para cada token de um dump
async fn report_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReportRequest>,
) -> Response {
    if req.tokens.is_empty() {
        return bad_request("Dump sem tokens");
    }
    let reports = state.decoder.report_tokens(&req.tokens);
    for report in &reports {
        for raw in &report.unmatched {
            report_unmatched(Some(&report.term), raw);
        }
    }
    Json(ReportResponse {
        total_tokens: reports.len(),
        reports,
    })
    .into_response()
}

/// Lista a tabela de regras em ordem de prioridade
async fn rules_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(describe_rules(state.decoder.rules()))
}

/// Dump de demonstração
async fn demo_dump_handler() -> impl IntoResponse {
    Json(demo_dump())
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Lógica do WebSocket: recebe um dump, decodifica e envia eventos em tempo real
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                if text.trim().is_empty() {
                    continue;
                }

                let worker_state = Arc::clone(&state);
                let events = tokio::task::spawn_blocking(move || {
                    dump_events(&worker_state.decoder, &text)
                })
                .await
                .unwrap_or_else(|e| {
                    vec![DecodeEvent::Error {
                        message: format!("Falha interna na decodificação: {e}"),
                    }]
                });

                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                        if !state.stream_delay.is_zero() {
                            tokio::time::sleep(state.stream_delay).await;
                        }
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

/// Lê um dump recebido como texto e produz todos os eventos de decodificação.
///
/// Um dump malformado vira um único `DecodeEvent::Error`.
fn dump_events(decoder: &Decoder, text: &str) -> Vec<DecodeEvent> {
    let tokens = match parse_dump(text) {
        Ok(tokens) => tokens,
        Err(e) => {
            warn!("Dump inválido recebido via WebSocket: {e}");
            return vec![DecodeEvent::Error {
                message: e.to_string(),
            }];
        }
    };
    info!("Decodificando via WebSocket: {} tokens", tokens.len());

    let (tx, rx) = std::sync::mpsc::channel::<DecodeEvent>();
    decoder.decode_streaming(&tokens, tx);
    rx.try_iter()
        .inspect(|event| {
            if let DecodeEvent::Unmatched { term, raw, .. } = event {
                report_unmatched(Some(term), raw);
            }
        })
        .collect()
}

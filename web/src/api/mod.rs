//! Rotas HTTP de intake: criação/consulta/cancelamento de requisições de
//! emissão de NFC-e. O processamento em si roda fora da requisição HTTP, nos
//! consumidores AMQP montados em `main.rs` — esta camada só enfileira e lê o
//! estado já persistido, no mesmo estilo de handler fino do teacher.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{PostgresClient, RequestRow};
use crate::error::ApiError;
use crate::orchestrator::{cancel, EmitInput};
use crate::queue::{CancelMessage, EmitMessage, QueueClient};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PostgresClient>,
    pub queue: Arc<QueueClient>,
}

#[derive(Serialize)]
struct RequestView {
    id: Uuid,
    status: String,
    access_key: Option<String>,
    protocol: Option<String>,
    number: Option<i64>,
    series: Option<i32>,
    reject_code: Option<String>,
    reject_reason: Option<String>,
    retry_count: i32,
    contingency: bool,
    xml_url: Option<String>,
    pdf_url: Option<String>,
    qr_url: Option<String>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl From<RequestRow> for RequestView {
    fn from(row: RequestRow) -> Self {
        Self {
            id: row.id,
            status: row.status.to_string(),
            access_key: row.access_key,
            protocol: row.protocol,
            number: row.number,
            series: row.series,
            reject_code: row.reject_code,
            reject_reason: row.reject_reason,
            retry_count: row.retry_count,
            contingency: row.contingency,
            xml_url: row.xml_url,
            pdf_url: row.pdf_url,
            qr_url: row.qr_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(serde::Deserialize)]
struct CancelBody {
    justificativa: String,
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// `POST /nfce` — cria a requisição em `pending` e a enfileira para o
/// worker de emissão. Idempotente por `Idempotency-Key`: uma chave repetida
/// devolve o estado da requisição original em vez de emitir de novo.
pub async fn create_emission(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<EmitInput>,
) -> Result<HttpResponse, ApiError> {
    let idempotency_key = req
        .headers()
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingIdempotencyKey)?
        .to_string();

    if let Some(existing) = state
        .db
        .find_by_idempotency_key(&idempotency_key)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    {
        if existing.status == crate::db::RequestStatus::Rejected {
            return Err(ApiError::IdempotencyConflict {
                status: existing.status.to_string(),
                request_id: existing.id.to_string(),
            });
        }
        return Ok(HttpResponse::Ok().json(RequestView::from(existing)));
    }

    let input = body.into_inner();
    input.validate().map_err(ApiError::from)?;

    let id = Uuid::new_v4();
    let payload = serde_json::to_value(&input).map_err(|e| ApiError::Internal(e.to_string()))?;

    let row = state
        .db
        .insert_request(id, &idempotency_key, input.company_id, payload)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    state
        .queue
        .publish_emit(&EmitMessage {
            request_id: row.id,
            idempotency_key: idempotency_key.clone(),
            retry_count: 0,
            enqueued_at: Utc::now(),
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Accepted().json(RequestView::from(row)))
}

pub async fn get_request(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let row = state
        .db
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(RequestView::from(row)))
}

pub async fn list_request_events(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state.db.find_by_id(id).await.map_err(|e| ApiError::Internal(e.to_string()))?.ok_or(ApiError::NotFound)?;
    let events = state
        .db
        .list_events(id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok().json(events))
}

/// `GET /nfce/{id}/{artifact}` com `artifact` em `xml`, `pdf` ou `qrcode` —
/// redireciona para a URL pública do object store. 404 se a nota ainda não
/// foi autorizada ou o upload do artefato falhou.
pub async fn get_artifact(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, ApiError> {
    let (id, artifact) = path.into_inner();
    let row = state
        .db
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or(ApiError::NotFound)?;

    let url = match artifact.as_str() {
        "xml" => row.xml_url,
        "pdf" => row.pdf_url,
        "qrcode" => row.qr_url,
        other => return Err(ApiError::BadRequest(format!("artefato desconhecido: {other}"))),
    };

    match url {
        Some(url) => Ok(HttpResponse::Found().append_header(("Location", url)).finish()),
        None => Err(ApiError::NotFound),
    }
}

/// `POST /nfce/{id}/cancel` — valida a justificativa e enfileira o evento
/// de cancelamento; o estado só muda quando o consumidor de `nfce.cancel`
/// processa a mensagem.
pub async fn cancel_request(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CancelBody>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    cancel::validar_justificativa(&body.justificativa).map_err(ApiError::from)?;

    let row = state
        .db
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or(ApiError::NotFound)?;

    if row.status != crate::db::RequestStatus::Authorized {
        return Err(ApiError::InvalidState { current: row.status.to_string() });
    }

    state
        .queue
        .publish_cancel(&CancelMessage {
            request_id: id,
            idempotency_key: row.idempotency_key.clone(),
            justificativa: body.justificativa.clone(),
            enqueued_at: Utc::now(),
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Accepted().json(RequestView::from(row)))
}

//! Taxonomia de erros do serviço
//!
//! Um enum por fronteira: `OrchestratorError` para o pipeline de emissão,
//! `ApiError` na borda HTTP. Nada de `Result<_, String>` nem `anyhow` —
//! cada etapa propaga um erro tipado que carrega o suficiente para decidir
//! retry/terminal na camada acima.

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Erros que podem interromper uma tentativa de emissão dentro do orquestrador.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("corpo da requisição inválido: {0}")]
    InvalidInput(String),

    #[error("já existe uma requisição com esta chave de idempotência em estado incompatível")]
    IdempotencyConflict { existing_request_id: String },

    #[error("falha ao carregar material de assinatura: {0}")]
    KeyLoad(String),

    #[error("certificado digital expirado")]
    CertExpired,

    #[error("documento não validou contra o XSD da NFC-e 4.00: {0}")]
    SchemaInvalid(String),

    #[error("falha ao assinar XML da NFC-e: {0}")]
    SignFailed(String),

    #[error("SEFAZ rejeitou o documento (cStat={cstat}): {motivo}")]
    SefazRejected { cstat: u16, motivo: String },

    #[error("SEFAZ indisponível (cStat={cstat}): {motivo}")]
    SefazUnavailable { cstat: u16, motivo: String },

    #[error("falha transitória na comunicação com a SEFAZ: {0}")]
    SefazTransient(String),

    #[error("número máximo de tentativas excedido")]
    MaxRetriesExceeded,

    #[error("falha ao persistir artefato no object store: {0}")]
    ArtifactStoreFailure(String),

    #[error("erro de persistência: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("UF desconhecida: {0}")]
    UnknownState(#[from] nfce_core::estados::UfDesconhecida),

    #[error("erro ao construir XML da NFC-e: {0}")]
    Builder(#[from] nfce_core::builder::ErroConstrucao),
}

impl OrchestratorError {
    /// Indica se este erro deve agendar uma nova tentativa (`retrying`) ou
    /// encerrar a requisição de forma terminal (`rejected`).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OrchestratorError::SefazUnavailable { .. }
                | OrchestratorError::SefazTransient(_)
                | OrchestratorError::Persistence(_)
        )
    }
}

/// Erros retornados diretamente pela API HTTP de intake.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("cabeçalho Idempotency-Key ausente")]
    MissingIdempotencyKey,

    #[error("requisição não encontrada")]
    NotFound,

    #[error("conflito de idempotência: requisição prévia em estado '{status}'")]
    IdempotencyConflict { status: String, request_id: String },

    #[error("requisição não está em estado que permita esta operação (atual: {current})")]
    InvalidState { current: String },

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error("erro interno: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::BadRequest(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_input",
                "message": msg,
            })),
            ApiError::MissingIdempotencyKey => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "missing_idempotency_key",
                    "message": "o cabeçalho Idempotency-Key é obrigatório",
                }))
            }
            ApiError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "not_found",
            })),
            ApiError::IdempotencyConflict { status, request_id } => {
                HttpResponse::Conflict().json(serde_json::json!({
                    "error": "idempotency_conflict",
                    "status": status,
                    "id": request_id,
                }))
            }
            ApiError::InvalidState { current } => HttpResponse::Conflict().json(serde_json::json!({
                "error": "invalid_state",
                "current_status": current,
            })),
            ApiError::Orchestrator(OrchestratorError::InvalidInput(msg)) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "invalid_input",
                    "message": msg,
                }))
            }
            ApiError::Orchestrator(err) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "orchestrator_error",
                "message": err.to_string(),
            })),
            ApiError::Internal(msg) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "internal",
                "message": msg,
            })),
        }
    }
}

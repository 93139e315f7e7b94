//! Serviço de emissão assíncrona de NFC-e
//!
//! Expõe uma API REST de intake (`/nfce`) que persiste a requisição e a
//! enfileira em `nfce.emit`/`nfce.cancel`; dois consumidores de fundo (e um
//! scanner de retries) rodam o pipeline do orquestrador sobre o mesmo
//! runtime Tokio do `actix-web`.

mod api;
mod certificado;
mod config;
mod db;
mod error;
mod orchestrator;
mod pdf;
mod queue;
mod sefaz;
mod storage;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use futures_util::StreamExt;
use lapin::message::Delivery;
use lapin::options::{BasicAckOptions, BasicNackOptions};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};

use api::AppState;
use certificado::CertificadoA1;
use config::Config;
use db::PostgresClient;
use nfce_core::Endereco;
use orchestrator::{IssuerProfile, Orchestrator};
use queue::{CancelMessage, EmitMessage, QueueClient};
use storage::StorageClient;

/// Tempo máximo de espera, no encerramento gracioso, pelos handlers de
/// emissão/cancelamento já em andamento antes de derrubar o processo.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Confirma ou devolve à fila a mensagem processada. Falhas transitórias
/// (SEFAZ indisponível, Postgres fora do ar) viram nack com requeue — a
/// mensagem volta para `nfce.emit`/`nfce.cancel` e é tentada de novo por
/// este worker ou outro. Sucesso e falhas terminais (rejeição definitiva,
/// payload malformado) são ack'ados: reentregar não mudaria o resultado.
async fn finalize_delivery(delivery: Delivery, transient_failure: bool, fila: &str) {
    if transient_failure {
        if let Err(e) = delivery.nack(BasicNackOptions { requeue: true, ..Default::default() }).await {
            tracing::error!(error = %e, fila, "falha ao enviar nack de mensagem");
        }
    } else if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
        tracing::error!(error = %e, fila, "falha ao confirmar mensagem");
    }
}

/// Carrega o emitente único configurado para esta instância do serviço.
///
/// O cadastro de empresas é mantido fora deste serviço (`companies`, owned
/// externally); aqui assumimos um processo por emitente, configurado via
/// variáveis de ambiente — simplificação documentada em DESIGN.md.
fn load_issuer_profile() -> IssuerProfile {
    let company_id = env::var("COMPANY_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(uuid::Uuid::new_v4);

    let cert_path = env::var("CERT_PATH").unwrap_or_else(|_| "./certificado.pfx".to_string());
    let cert_password = env::var("CERT_PASSWORD").unwrap_or_default();
    let certificado = CertificadoA1::from_file(&cert_path, &cert_password)
        .unwrap_or_else(|e| panic!("falha ao carregar certificado em {cert_path}: {e}"));

    IssuerProfile {
        company_id,
        cnpj: env::var("COMPANY_CNPJ").unwrap_or_default(),
        razao_social: env::var("COMPANY_RAZAO_SOCIAL").unwrap_or_default(),
        nome_fantasia: env::var("COMPANY_NOME_FANTASIA").ok(),
        ie: env::var("COMPANY_IE").unwrap_or_default(),
        endereco: Endereco {
            logradouro: env::var("COMPANY_LOGRADOURO").unwrap_or_default(),
            numero: env::var("COMPANY_NUMERO").unwrap_or_default(),
            complemento: env::var("COMPANY_COMPLEMENTO").ok(),
            bairro: env::var("COMPANY_BAIRRO").unwrap_or_default(),
            codigo_municipio: env::var("COMPANY_CODIGO_MUNICIPIO").ok().and_then(|v| v.parse().ok()).unwrap_or(0),
            nome_municipio: env::var("COMPANY_MUNICIPIO").unwrap_or_default(),
            sigla_uf: env::var("COMPANY_UF").unwrap_or_default(),
            cep: env::var("COMPANY_CEP").unwrap_or_default(),
            codigo_pais: Some("1058".to_string()),
            nome_pais: Some("Brasil".to_string()),
            telefone: env::var("COMPANY_TELEFONE").ok(),
        },
        codigo_municipio: env::var("COMPANY_CODIGO_MUNICIPIO").ok().and_then(|v| v.parse().ok()).unwrap_or(0),
        csc: env::var("COMPANY_CSC").unwrap_or_default(),
        id_token_csc: env::var("COMPANY_ID_TOKEN_CSC").unwrap_or_default(),
        certificado,
    }
}

/// Consome `nfce.emit`: cada mensagem dispara uma tentativa de
/// `process_emission` sob uma vaga de `limiter` (tamanho = `worker_concurrency`).
/// Ack em sucesso ou falha terminal (vira `retrying`/`rejected` no banco);
/// nack com requeue em falha transitória (SEFAZ/Postgres fora do ar), para
/// o AMQP reentregar em vez de perder a mensagem. Encerra assim que
/// `shutdown` dispara, sem aceitar mais trabalho da fila.
async fn spawn_emit_consumer(
    queue: Arc<QueueClient>,
    orchestrator: Arc<Orchestrator>,
    issuer: Arc<IssuerProfile>,
    limiter: Arc<Semaphore>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut consumer = match queue.consume_emit("nfce-emit-worker").await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "falha ao abrir consumidor de nfce.emit");
            return;
        }
    };

    loop {
        let delivery = tokio::select! {
            biased;
            _ = shutdown.changed() => {
                tracing::info!("encerrando consumidor de nfce.emit");
                break;
            }
            next = consumer.next() => match next {
                Some(d) => d,
                None => break,
            },
        };

        let delivery = match delivery {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, "erro ao receber mensagem de nfce.emit");
                continue;
            }
        };

        let Ok(permit) = limiter.clone().acquire_owned().await else {
            break;
        };
        let orchestrator = orchestrator.clone();
        let issuer = issuer.clone();

        tokio::spawn(async move {
            let _permit = permit;
            let message: Result<EmitMessage, _> = serde_json::from_slice(&delivery.data);
            let transient = match message {
                Ok(msg) => match orchestrator.process_emission(msg.request_id, &issuer).await {
                    Ok(outcome) => {
                        tracing::info!(request_id = %msg.request_id, outcome = ?outcome, "tentativa de emissão processada");
                        false
                    }
                    Err(e) => {
                        tracing::error!(request_id = %msg.request_id, error = %e, "falha ao processar emissão");
                        e.is_transient()
                    }
                },
                Err(e) => {
                    tracing::error!(error = %e, "mensagem de nfce.emit malformada");
                    false
                }
            };
            finalize_delivery(delivery, transient, "nfce.emit").await;
        });
    }
}

async fn spawn_cancel_consumer(
    queue: Arc<QueueClient>,
    orchestrator: Arc<Orchestrator>,
    issuer: Arc<IssuerProfile>,
    limiter: Arc<Semaphore>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut consumer = match queue.consume_cancel("nfce-cancel-worker").await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "falha ao abrir consumidor de nfce.cancel");
            return;
        }
    };

    loop {
        let delivery = tokio::select! {
            biased;
            _ = shutdown.changed() => {
                tracing::info!("encerrando consumidor de nfce.cancel");
                break;
            }
            next = consumer.next() => match next {
                Some(d) => d,
                None => break,
            },
        };

        let delivery = match delivery {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, "erro ao receber mensagem de nfce.cancel");
                continue;
            }
        };

        let Ok(permit) = limiter.clone().acquire_owned().await else {
            break;
        };
        let orchestrator = orchestrator.clone();
        let issuer = issuer.clone();

        tokio::spawn(async move {
            let _permit = permit;
            let message: Result<CancelMessage, _> = serde_json::from_slice(&delivery.data);
            let transient = match message {
                Ok(msg) => match orchestrator
                    .process_cancellation(msg.request_id, &issuer, &msg.justificativa)
                    .await
                {
                    Ok(outcome) => {
                        tracing::info!(request_id = %msg.request_id, outcome = ?outcome, "cancelamento processado");
                        false
                    }
                    Err(e) => {
                        tracing::error!(request_id = %msg.request_id, error = %e, "falha ao processar cancelamento");
                        e.is_transient()
                    }
                },
                Err(e) => {
                    tracing::error!(error = %e, "mensagem de nfce.cancel malformada");
                    false
                }
            };
            finalize_delivery(delivery, transient, "nfce.cancel").await;
        });
    }
}

/// Corre até receber Ctrl+C ou SIGTERM, o que vier primeiro.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("falha ao instalar handler de SIGTERM");
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}

/// Varre periodicamente `nfce_requests` em `retrying` cujo `next_retry_at`
/// já passou e republica cada uma em `nfce.emit`.
async fn spawn_retry_scanner(db: Arc<PostgresClient>, queue: Arc<QueueClient>) {
    let mut ticker = tokio::time::interval(Duration::from_secs(30));
    loop {
        ticker.tick().await;
        let due = match db.due_retries(chrono::Utc::now()).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(error = %e, "falha ao varrer retries pendentes");
                continue;
            }
        };
        for row in due {
            let message = EmitMessage {
                request_id: row.id,
                idempotency_key: row.idempotency_key.clone(),
                retry_count: row.retry_count,
                enqueued_at: chrono::Utc::now(),
            };
            if let Err(e) = queue.publish_emit(&message).await {
                tracing::error!(request_id = %row.id, error = %e, "falha ao republicar retry");
            }
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let config = Arc::new(Config::from_env());

    let db = Arc::new(
        PostgresClient::connect(&config.database_url)
            .await
            .expect("falha ao conectar ao Postgres"),
    );
    db.migrate().await.expect("falha ao rodar migrações do orquestrador");

    let storage = Arc::new(
        StorageClient::from_config(
            config.s3_endpoint.as_deref(),
            &config.s3_region,
            config.s3_bucket.clone(),
            config.storage_public_url.clone(),
        )
        .await,
    );

    let queue = Arc::new(
        QueueClient::connect(&config.amqp_url)
            .await
            .expect("falha ao conectar ao broker AMQP"),
    );

    let issuer = Arc::new(load_issuer_profile());
    let orchestrator = Arc::new(Orchestrator::new(db.clone(), storage.clone(), config.clone()));

    // Uma vaga por mensagem em processamento simultâneo, por fila; o
    // shutdown gracioso espera o semáforo voltar a ficar totalmente livre.
    let limiter = Arc::new(Semaphore::new(config.worker_concurrency.max(1)));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(spawn_emit_consumer(
        queue.clone(),
        orchestrator.clone(),
        issuer.clone(),
        limiter.clone(),
        shutdown_rx.clone(),
    ));
    tokio::spawn(spawn_cancel_consumer(
        queue.clone(),
        orchestrator.clone(),
        issuer.clone(),
        limiter.clone(),
        shutdown_rx,
    ));
    tokio::spawn(spawn_retry_scanner(db.clone(), queue.clone()));

    let state = web::Data::new(AppState { db: db.clone(), queue: queue.clone() });
    let bind_addr = config.bind_addr();

    tracing::info!(addr = %bind_addr, "iniciando nfce-service");

    let server = HttpServer::new(move || {
        let cors = Cors::default().allow_any_origin().allow_any_method().allow_any_header();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(middleware::Compress::default())
            .route("/health", web::get().to(api::health))
            .route("/nfce", web::post().to(api::create_emission))
            .route("/nfce/{id}", web::get().to(api::get_request))
            .route("/nfce/{id}/events", web::get().to(api::list_request_events))
            .route("/nfce/{id}/cancel", web::post().to(api::cancel_request))
            .route("/nfce/{id}/{artifact}", web::get().to(api::get_artifact))
    })
    .bind(&bind_addr)?
    .run();

    let server_handle = server.handle();
    let worker_concurrency = config.worker_concurrency.max(1) as u32;

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => {
            tracing::info!("sinal de encerramento recebido, iniciando graceful shutdown");
            let _ = shutdown_tx.send(true);
            server_handle.stop(true).await;

            let drained = tokio::time::timeout(SHUTDOWN_GRACE, limiter.acquire_many(worker_concurrency)).await;
            if drained.is_err() {
                tracing::warn!("tempo de graça de 30s esgotado, encerrando com handlers em voo");
            }
            Ok(())
        }
    }
}

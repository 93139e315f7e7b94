//! Topologia AMQP do orquestrador: troca `nfce.exchange` direta e
//! durável, filas `nfce.emit`/`nfce.cancel` duráveis.
//!
//! Sem precedente no teacher (que não fala com nenhum broker); grounded na
//! dupla `lapin` + `tokio-executor-trait`/`tokio-reactor-trait` para rodar o
//! cliente AMQP sobre o runtime Tokio que o `actix-web` já traz.

use chrono::{DateTime, Utc};
use lapin::options::{
    BasicConsumeOptions, BasicPublishOptions, ExchangeDeclareOptions, QueueBindOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, Consumer};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const EXCHANGE: &str = "nfce.exchange";
pub const QUEUE_EMIT: &str = "nfce.emit";
pub const QUEUE_CANCEL: &str = "nfce.cancel";

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("erro AMQP: {0}")]
    Amqp(#[from] lapin::Error),
    #[error("erro ao serializar mensagem: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitMessage {
    pub request_id: Uuid,
    pub idempotency_key: String,
    pub retry_count: i32,
    pub enqueued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelMessage {
    pub request_id: Uuid,
    pub idempotency_key: String,
    pub justificativa: String,
    pub enqueued_at: DateTime<Utc>,
}

/// Canal AMQP já com a topologia declarada, pronto para publicar/consumir.
#[derive(Clone)]
pub struct QueueClient {
    channel: Channel,
}

impl QueueClient {
    pub async fn connect(amqp_url: &str) -> Result<Self, QueueError> {
        let executor = tokio_executor_trait::Tokio::current();
        let reactor = tokio_reactor_trait::Tokio;
        let conn = Connection::connect_with_executor(
            amqp_url,
            ConnectionProperties::default().with_executor(executor).with_reactor(reactor),
        )
        .await?;
        let channel = conn.create_channel().await?;
        Self::declare_topology(&channel).await?;
        Ok(Self { channel })
    }

    /// Declara a exchange e as filas de forma idempotente (seguro de chamar
    /// em todo boot do processo).
    async fn declare_topology(channel: &Channel) -> Result<(), QueueError> {
        channel
            .exchange_declare(
                EXCHANGE,
                lapin::ExchangeKind::Direct,
                ExchangeDeclareOptions { durable: true, ..Default::default() },
                FieldTable::default(),
            )
            .await?;

        for (queue, routing_key) in [(QUEUE_EMIT, QUEUE_EMIT), (QUEUE_CANCEL, QUEUE_CANCEL)] {
            channel
                .queue_declare(
                    queue,
                    QueueDeclareOptions { durable: true, ..Default::default() },
                    FieldTable::default(),
                )
                .await?;
            channel
                .queue_bind(
                    queue,
                    EXCHANGE,
                    routing_key,
                    QueueBindOptions::default(),
                    FieldTable::default(),
                )
                .await?;
        }

        Ok(())
    }

    pub async fn publish_emit(&self, message: &EmitMessage) -> Result<(), QueueError> {
        let body = serde_json::to_vec(message)?;
        self.channel
            .basic_publish(
                EXCHANGE,
                QUEUE_EMIT,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default().with_delivery_mode(2),
            )
            .await?
            .await?;
        Ok(())
    }

    pub async fn publish_cancel(&self, message: &CancelMessage) -> Result<(), QueueError> {
        let body = serde_json::to_vec(message)?;
        self.channel
            .basic_publish(
                EXCHANGE,
                QUEUE_CANCEL,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default().with_delivery_mode(2),
            )
            .await?
            .await?;
        Ok(())
    }

    pub async fn consume_emit(&self, consumer_tag: &str) -> Result<Consumer, QueueError> {
        Ok(self
            .channel
            .basic_consume(
                QUEUE_EMIT,
                consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?)
    }

    pub async fn consume_cancel(&self, consumer_tag: &str) -> Result<Consumer, QueueError> {
        Ok(self
            .channel
            .basic_consume(
                QUEUE_CANCEL,
                consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mensagem_de_emissao_serializa_sem_duplicar_payload() {
        let msg = EmitMessage {
            request_id: Uuid::new_v4(),
            idempotency_key: "k1".to_string(),
            retry_count: 0,
            enqueued_at: Utc::now(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("request_id").is_some());
        assert!(json.get("payload").is_none());
    }
}

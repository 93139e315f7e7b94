//! Repositório Postgres para o orquestrador.
//!
//! A teacher repo declarava este módulo (`db::postgres`) sem nunca definir
//! o arquivo; aqui ele vira o repositório real por trás de `Request`/`Event`/
//! `NumberSequence`, com o padrão sqlx/pool/`query_as` já usado alhures no
//! projeto, generalizado para as tabelas do orquestrador.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{
    RequestRow, RequestStatus, ALLOCATE_SEQUENCE, APPEND_EVENT, CAS_STATUS, CREATE_TABLES,
    FIND_BY_ID, FIND_BY_IDEMPOTENCY_KEY, INSERT_REQUEST, LIST_EVENTS,
};
use super::EventRow;

#[derive(Clone)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_TABLES).execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Cria uma nova `Request` em `pending`. O chamador já deve ter
    /// verificado idempotência via [`Self::find_by_idempotency_key`].
    pub async fn insert_request(
        &self,
        id: Uuid,
        idempotency_key: &str,
        company_id: Uuid,
        payload: Value,
    ) -> Result<RequestRow, sqlx::Error> {
        sqlx::query_as::<_, RequestRow>(INSERT_REQUEST)
            .bind(id)
            .bind(idempotency_key)
            .bind(company_id)
            .bind(payload)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<RequestRow>, sqlx::Error> {
        sqlx::query_as::<_, RequestRow>(FIND_BY_IDEMPOTENCY_KEY)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RequestRow>, sqlx::Error> {
        sqlx::query_as::<_, RequestRow>(FIND_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Transição de estado otimista: só aplica se `status` ainda for
    /// `from`. Retorna `None` quando outra transição já venceu a corrida —
    /// o chamador trata isso como uma violação de protocolo.
    pub async fn cas_status(
        &self,
        id: Uuid,
        from: RequestStatus,
        to: RequestStatus,
    ) -> Result<Option<RequestRow>, sqlx::Error> {
        sqlx::query_as::<_, RequestRow>(CAS_STATUS)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn append_event(
        &self,
        request_id: Uuid,
        status_from: Option<RequestStatus>,
        status_to: RequestStatus,
        sefaz_status: Option<i32>,
        message: Option<&str>,
        metadata: Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(APPEND_EVENT)
            .bind(Uuid::new_v4())
            .bind(request_id)
            .bind(status_from)
            .bind(status_to)
            .bind(sefaz_status)
            .bind(message)
            .bind(metadata)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list_events(&self, request_id: Uuid) -> Result<Vec<EventRow>, sqlx::Error> {
        sqlx::query_as::<_, EventRow>(LIST_EVENTS)
            .bind(request_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Aloca o próximo `(series, number)` para `(company_id, series)` em um
    /// único round trip atômico (`INSERT ... ON CONFLICT ... RETURNING`).
    pub async fn allocate_sequence(&self, company_id: Uuid, series: i32) -> Result<i64, sqlx::Error> {
        let (number,): (i64,) = sqlx::query_as(ALLOCATE_SEQUENCE)
            .bind(company_id)
            .bind(series)
            .fetch_one(&self.pool)
            .await?;
        Ok(number)
    }

    /// Varre requisições `retrying` cujo `next_retry_at` já passou.
    pub async fn due_retries(&self, now: DateTime<Utc>) -> Result<Vec<RequestRow>, sqlx::Error> {
        sqlx::query_as::<_, RequestRow>(
            "SELECT * FROM nfce_requests WHERE status = 'retrying' AND next_retry_at <= $1",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn set_retry_schedule(
        &self,
        id: Uuid,
        retry_count: i32,
        next_retry_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE nfce_requests SET retry_count = $2, next_retry_at = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(retry_count)
        .bind(next_retry_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn set_authorized(
        &self,
        id: Uuid,
        access_key: &str,
        protocol: &str,
        number: i64,
        series: i32,
        xml_url: Option<&str>,
        pdf_url: Option<&str>,
        qr_url: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"UPDATE nfce_requests SET
                access_key = $2, protocol = $3, number = $4, series = $5,
                xml_url = $6, pdf_url = $7, qr_url = $8,
                authorized_at = now(), processed_at = now(), updated_at = now()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(access_key)
        .bind(protocol)
        .bind(number)
        .bind(series)
        .bind(xml_url)
        .bind(pdf_url)
        .bind(qr_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Atualiza as URLs dos artefatos após o upload ter sido concluído.
    /// `set_authorized` já grava a linha com URLs `NULL`/previstas antes do
    /// upload rodar; esta chamada substitui pelas URLs reais quando cada
    /// artefato termina de subir (campos não enviados ficam como estão).
    pub async fn set_artifact_urls(
        &self,
        id: Uuid,
        xml_url: Option<&str>,
        pdf_url: Option<&str>,
        qr_url: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"UPDATE nfce_requests SET
                xml_url = COALESCE($2, xml_url),
                pdf_url = COALESCE($3, pdf_url),
                qr_url = COALESCE($4, qr_url),
                updated_at = now()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(xml_url)
        .bind(pdf_url)
        .bind(qr_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn set_rejected(
        &self,
        id: Uuid,
        reject_code: &str,
        reject_reason: &str,
        sefaz_status: Option<i32>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"UPDATE nfce_requests SET
                reject_code = $2, reject_reason = $3, sefaz_status = $4,
                processed_at = now(), updated_at = now()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(reject_code)
        .bind(reject_reason)
        .bind(sefaz_status)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

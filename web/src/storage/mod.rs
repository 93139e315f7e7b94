//! Armazenamento de artefatos em um object store S3-compatível.
//!
//! Sem precedente no teacher (que nunca fala com um object store); grounded
//! em `Ooriginador-GIRO/giro-license-server/backend/Cargo.toml`, o único
//! manifesto do pacote que depende de `aws-sdk-s3`/`aws-config`.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("falha ao enviar artefato para o object store: {0}")]
    Upload(String),
}

/// Os três artefatos de uma NFC-e autorizada, com suas chaves previstas
/// mesmo quando o upload falha ("fallback URLs (predicted keys)").
#[derive(Debug, Clone)]
pub struct ArtifactKeys {
    pub xml: String,
    pub pdf: String,
    pub qr: String,
}

impl ArtifactKeys {
    pub fn for_access_key(company_id: &str, access_key: &str) -> Self {
        Self {
            xml: format!("nfce/{company_id}/xml/{access_key}.xml"),
            pdf: format!("nfce/{company_id}/pdf/{access_key}.pdf"),
            qr: format!("nfce/{company_id}/qr/{access_key}.png"),
        }
    }
}

/// Cliente do object store de artefatos.
#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    bucket: String,
    public_url_prefix: String,
}

impl StorageClient {
    pub fn new(client: Client, bucket: String, public_url_prefix: String) -> Self {
        Self { client, bucket, public_url_prefix }
    }

    pub async fn from_config(endpoint: Option<&str>, region: &str, bucket: String, public_url_prefix: String) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest()).region(aws_sdk_s3::config::Region::new(region.to_string()));
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared_config = loader.load().await;
        let client = Client::new(&shared_config);
        Self::new(client, bucket, public_url_prefix)
    }

    pub async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?
            .into_bytes();
        Ok(bytes.to_vec())
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url_prefix.trim_end_matches('/'), key)
    }
}

/// Faz upload dos três artefatos de uma autorização. Uma falha em qualquer
/// um deles é não-fatal: o chamador já persistiu a chave prevista antes de
/// chamar esta função e usa [`ArtifactKeys`] como URL de fallback.
pub async fn upload_artifacts(
    storage: &StorageClient,
    keys: &ArtifactKeys,
    xml: &[u8],
    pdf: &[u8],
    qr_png: &[u8],
) -> Vec<(&'static str, Result<(), StorageError>)> {
    vec![
        ("xml", storage.put(&keys.xml, xml.to_vec(), "application/xml").await),
        ("pdf", storage.put(&keys.pdf, pdf.to_vec(), "application/pdf").await),
        ("qr", storage.put(&keys.qr, qr_png.to_vec(), "image/png").await),
    ]
}

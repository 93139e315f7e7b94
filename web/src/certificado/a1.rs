//! Certificado Digital A1 (arquivo .pfx/.p12)
//!
//! Parsing real de certificado PKCS12 usando as crates `p12` e `x509-cert`.

use std::fs;
use std::path::Path;

use base64::Engine;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Falha ao decodificar o pacote PKCS#12 ou extrair a chave privada.
#[derive(Debug, Error)]
pub enum KeyLoadError {
    #[error("erro ao ler arquivo do certificado: {0}")]
    Io(#[from] std::io::Error),
    #[error("arquivo não parece ser um certificado PKCS12 válido")]
    NotPkcs12,
    #[error("erro ao parsear PKCS12: {0:?}")]
    Pkcs12Parse(String),
    #[error("senha incorreta ou bundle corrompido: {0:?}")]
    WrongPassphrase(String),
    #[error("certificado não encontrado no arquivo PFX")]
    CertMissing,
    #[error("chave privada não encontrada no arquivo PFX")]
    PrivateKeyMissing,
    #[error("chave privada não é RSA: {0:?}")]
    NotRsa(String),
    #[error("erro ao parsear certificado X509: {0:?}")]
    X509Parse(String),
}

/// Certificado expirado ou ainda não válido.
#[derive(Debug, Error)]
#[error("certificado fora da janela de validade (not_before={not_before}, not_after={not_after})")]
pub struct CertExpired {
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

/// Informações do certificado digital, seguras para log/serialização — nunca
/// contém a senha ou a chave privada.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CertificadoInfo {
    pub subject: String,
    pub issuer: String,
    pub serial_number: String,
    pub not_before: String,
    pub not_after: String,
    pub cnpj: Option<String>,
    pub razao_social: Option<String>,
    pub valido: bool,
    pub dias_para_expirar: i64,
}

/// Certificado A1 carregado em memória. `senha` e `private_key_der` nunca
/// derivam `Debug`/`Serialize` diretamente e não devem ser logados.
#[derive(Clone)]
pub struct CertificadoA1 {
    pfx_data: Vec<u8>,
    senha: String,
    pub info: CertificadoInfo,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    /// Certificado X509 em DER
    cert_der: Vec<u8>,
    /// Chave privada em DER (PKCS8)
    private_key_der: Vec<u8>,
}

impl std::fmt::Debug for CertificadoA1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificadoA1")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl CertificadoA1 {
    /// Carrega certificado de arquivo .pfx/.p12
    pub fn from_file<P: AsRef<Path>>(path: P, senha: &str) -> Result<Self, KeyLoadError> {
        let pfx_data = fs::read(path.as_ref())?;
        Self::from_bytes(&pfx_data, senha)
    }

    /// Carrega certificado de bytes (já decodificados de base64, se aplicável)
    pub fn from_bytes(pfx_data: &[u8], senha: &str) -> Result<Self, KeyLoadError> {
        if pfx_data.len() < 10 || pfx_data[0] != 0x30 {
            return Err(KeyLoadError::NotPkcs12);
        }

        let pfx = p12::PFX::parse(pfx_data).map_err(|e| KeyLoadError::Pkcs12Parse(format!("{:?}", e)))?;

        let certs = pfx
            .cert_bags(senha)
            .map_err(|e| KeyLoadError::WrongPassphrase(format!("{:?}", e)))?;
        let keys = pfx
            .key_bags(senha)
            .map_err(|e| KeyLoadError::WrongPassphrase(format!("{:?}", e)))?;

        let cert_der = certs.into_iter().next().ok_or(KeyLoadError::CertMissing)?;
        let private_key_der = keys.into_iter().next().ok_or(KeyLoadError::PrivateKeyMissing)?;

        // A RSA-ness da chave só é confirmada ao decodificá-la (ver `private_key`);
        // aqui garantimos apenas que o PKCS8 é bem formado.
        {
            use pkcs8::DecodePrivateKey;
            rsa::RsaPrivateKey::from_pkcs8_der(&private_key_der)
                .map_err(|e| KeyLoadError::NotRsa(format!("{:?}", e)))?;
        }

        let (info, not_before, not_after) = Self::extract_cert_info(&cert_der)?;

        Ok(Self {
            pfx_data: pfx_data.to_vec(),
            senha: senha.to_string(),
            info,
            not_before,
            not_after,
            cert_der,
            private_key_der,
        })
    }

    /// Verifica a janela de validade do certificado contra o instante atual.
    pub fn checar_validade(&self) -> Result<(), CertExpired> {
        let now = Utc::now();
        if now < self.not_before || now > self.not_after {
            return Err(CertExpired {
                not_before: self.not_before,
                not_after: self.not_after,
            });
        }
        Ok(())
    }

    fn extract_cert_info(
        cert_der: &[u8],
    ) -> Result<(CertificadoInfo, DateTime<Utc>, DateTime<Utc>), KeyLoadError> {
        use der::Decode;
        use x509_cert::Certificate;

        let cert = Certificate::from_der(cert_der).map_err(|e| KeyLoadError::X509Parse(format!("{:?}", e)))?;

        let subject = cert.tbs_certificate.subject.to_string();
        let issuer = cert.tbs_certificate.issuer.to_string();
        let serial_number = hex::encode(cert.tbs_certificate.serial_number.as_bytes());

        let not_before: DateTime<Utc> = cert.tbs_certificate.validity.not_before.to_system_time().into();
        let not_after: DateTime<Utc> = cert.tbs_certificate.validity.not_after.to_system_time().into();

        let now = Utc::now();
        let dias_para_expirar = (not_after - now).num_days();
        let valido = now >= not_before && now <= not_after;

        let cnpj = Self::extract_cnpj_from_subject(&subject);
        let razao_social = Self::extract_cn_from_subject(&subject);

        Ok((
            CertificadoInfo {
                subject: subject.clone(),
                issuer,
                serial_number,
                not_before: not_before.format("%Y-%m-%d %H:%M:%S").to_string(),
                not_after: not_after.format("%Y-%m-%d %H:%M:%S").to_string(),
                cnpj,
                razao_social,
                valido,
                dias_para_expirar,
            },
            not_before,
            not_after,
        ))
    }

    /// Extrai CNPJ do subject do certificado (padrão ICP-Brasil)
    fn extract_cnpj_from_subject(subject: &str) -> Option<String> {
        if let Some(pos) = subject.find("serialNumber=") {
            let start = pos + 13;
            let end = subject[start..]
                .find(|c: char| c == ',' || c == '+' || c == '/')
                .map(|p| start + p)
                .unwrap_or(subject.len());
            let digits: String = subject[start..end].chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.len() == 14 {
                return Some(digits);
            }
        }

        if let Some(pos) = subject.find("2.16.76.1.3.3=") {
            let start = pos + 14;
            let end = subject[start..]
                .find(|c: char| c == ',' || c == '+' || c == '/')
                .map(|p| start + p)
                .unwrap_or(subject.len());
            let digits: String = subject[start..end].chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.len() == 14 {
                return Some(digits);
            }
        }

        let re = regex::Regex::new(r"(\d{14})").ok()?;
        for cap in re.captures_iter(subject) {
            if let Some(m) = cap.get(1) {
                let digits = m.as_str();
                if !digits.starts_with("000000") {
                    return Some(digits.to_string());
                }
            }
        }

        None
    }

    /// Extrai Common Name (CN) do subject
    fn extract_cn_from_subject(subject: &str) -> Option<String> {
        if let Some(pos) = subject.find("CN=") {
            let start = pos + 3;
            let end = subject[start..]
                .find(|c: char| c == ',' || c == '+')
                .map(|p| start + p)
                .unwrap_or(subject.len());
            let cn = subject[start..end].trim();
            if !cn.is_empty() {
                return Some(cn.to_string());
            }
        }
        None
    }

    /// Retorna o certificado em base64 (formato PEM sem headers)
    pub fn cert_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.cert_der)
    }

    /// Retorna os bytes DER do certificado X509
    pub fn cert_der(&self) -> &[u8] {
        &self.cert_der
    }

    /// Retorna os bytes do PFX para uso com `reqwest::Identity`
    pub fn pfx_bytes(&self) -> &[u8] {
        &self.pfx_data
    }

    /// Retorna a senha (uso exclusivo para montar a `reqwest::Identity`; nunca logar)
    pub fn senha(&self) -> &str {
        &self.senha
    }

    /// Verifica se o certificado ainda é válido
    pub fn is_valid(&self) -> bool {
        self.info.valido && self.info.dias_para_expirar > 0
    }

    /// Retorna a chave privada RSA
    pub fn private_key(&self) -> Result<rsa::RsaPrivateKey, KeyLoadError> {
        use pkcs8::DecodePrivateKey;

        rsa::RsaPrivateKey::from_pkcs8_der(&self.private_key_der).map_err(|e| KeyLoadError::NotRsa(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_cnpj_serial_number() {
        let subject = "CN=EMPRESA TESTE LTDA:12345678000199,serialNumber=12345678000199,C=BR";
        let cnpj = CertificadoA1::extract_cnpj_from_subject(subject);
        assert_eq!(cnpj, Some("12345678000199".to_string()));
    }

    #[test]
    fn test_extract_cn() {
        let subject = "CN=EMPRESA TESTE LTDA,OU=AR,O=ICP-Brasil,C=BR";
        let cn = CertificadoA1::extract_cn_from_subject(subject);
        assert_eq!(cn, Some("EMPRESA TESTE LTDA".to_string()));
    }

    #[test]
    fn test_arquivo_pequeno_rejeitado() {
        let err = CertificadoA1::from_bytes(&[0x30, 0x01], "x");
        assert!(err.is_err());
    }

    #[test]
    fn test_arquivo_sem_magic_bytes_rejeitado() {
        let err = CertificadoA1::from_bytes(&[0u8; 32], "x");
        assert!(matches!(err, Err(KeyLoadError::NotPkcs12)));
    }
}

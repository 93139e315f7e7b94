//! Transporte SOAP com a SEFAZ (C5)
//!
//! Monta o envelope SOAP 1.2 para `NFeAutorizacao4`, envia via HTTPS com
//! mTLS usando o certificado do emitente, e classifica a resposta.

use super::endpoints::{self, EndpointPar, UnsupportedState};
use crate::certificado::{AssinadorXml, CertificadoA1};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Ambiente de operação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmbienteNfe {
    Producao = 1,
    Homologacao = 2,
}

impl AmbienteNfe {
    fn tp_amb(self) -> &'static str {
        match self {
            AmbienteNfe::Producao => "1",
            AmbienteNfe::Homologacao => "2",
        }
    }

    fn is_producao(self) -> bool {
        matches!(self, AmbienteNfe::Producao)
    }
}

/// Via de submissão: estado de origem do emitente ou contingência nacional/RS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rota<'a> {
    Estado(&'a str),
    SvcAn,
    SvcRs,
}

impl<'a> Rota<'a> {
    fn endpoint(&self) -> Result<EndpointPar, UnsupportedState> {
        match self {
            Rota::Estado(uf) => endpoints::autorizacao(uf),
            Rota::SvcAn => Ok(endpoints::svc_an()),
            Rota::SvcRs => Ok(endpoints::svc_rs()),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransporteError {
    #[error(transparent)]
    UnsupportedState(#[from] UnsupportedState),
    #[error("erro ao criar identidade mTLS: {0}")]
    Identity(String),
    #[error("erro ao criar cliente HTTP: {0}")]
    HttpClient(String),
    #[error("erro de assinatura: {0}")]
    Sign(String),
    #[error("falha de transporte (transitória): {0}")]
    Transport(String),
    #[error("SEFAZ retornou HTTP {0}")]
    HttpStatus(u16),
}

impl TransporteError {
    /// Falhas de rede/TLS/timeout são transitórias — o orquestrador retenta.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransporteError::Transport(_) | TransporteError::HttpStatus(_))
    }
}

/// Classificação de um `cStat` de resposta, conforme a tabela de bandas da SEFAZ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SefazOutcome {
    Autorizado,
    NegadoPermanente,
    ViolacaoRegraNegocio,
    DuplicidadeOuTiming,
    IrregularidadeFiscal,
    SchemaNegado,
    ErroServidor,
    ServicoIndisponivel,
    Desconhecido,
}

impl SefazOutcome {
    /// Estados terminais (`authorized`/`rejected`) não disparam retry nem contingência.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SefazOutcome::Autorizado
                | SefazOutcome::NegadoPermanente
                | SefazOutcome::ViolacaoRegraNegocio
                | SefazOutcome::DuplicidadeOuTiming
                | SefazOutcome::IrregularidadeFiscal
                | SefazOutcome::SchemaNegado
        )
    }

    pub fn triggers_contingency(self) -> bool {
        matches!(self, SefazOutcome::ServicoIndisponivel)
    }
}

/// Classifica o `cStat` retornado pela SEFAZ conforme a tabela de bandas oficial.
pub fn classify(cstat: u16) -> SefazOutcome {
    match cstat {
        108 | 109 | 691 | 692 | 693 => SefazOutcome::ServicoIndisponivel,
        100..=109 | 150 => SefazOutcome::Autorizado,
        110..=119 => SefazOutcome::NegadoPermanente,
        204 | 539 => SefazOutcome::DuplicidadeOuTiming,
        200..=299 => SefazOutcome::ViolacaoRegraNegocio,
        300..=399 => SefazOutcome::IrregularidadeFiscal,
        400..=499 => SefazOutcome::SchemaNegado,
        500..=599 => SefazOutcome::ErroServidor,
        _ => SefazOutcome::Desconhecido,
    }
}

/// Resultado interpretado de uma tentativa de autorização.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutorizacaoResult {
    pub cstat: u16,
    pub motivo: String,
    pub protocolo: Option<String>,
    pub outcome_raw: String,
}

/// Cliente SEFAZ para o serviço `NFeAutorizacao4`.
pub struct SefazClient {
    certificado: CertificadoA1,
    http_client: reqwest::Client,
    ambiente: AmbienteNfe,
}

impl SefazClient {
    pub fn new(certificado: CertificadoA1, ambiente: AmbienteNfe, timeout: Duration) -> Result<Self, TransporteError> {
        let identity = reqwest::Identity::from_pkcs12_der(certificado.pfx_bytes(), certificado.senha())
            .map_err(|e| TransporteError::Identity(e.to_string()))?;

        let http_client = reqwest::Client::builder()
            .identity(identity)
            .timeout(timeout)
            .danger_accept_invalid_certs(false)
            .build()
            .map_err(|e| TransporteError::HttpClient(e.to_string()))?;

        Ok(Self {
            certificado,
            http_client,
            ambiente,
        })
    }

    /// Assina e envia o XML da NFC-e para autorização na rota informada.
    pub async fn autorizar_nfe(
        &self,
        xml_nfe: &str,
        c_uf: u8,
        rota: Rota<'_>,
    ) -> Result<AutorizacaoResult, TransporteError> {
        let assinador = AssinadorXml::new(self.certificado.clone());
        let xml_assinado = assinador
            .assinar_nfe(xml_nfe)
            .map_err(|e| TransporteError::Sign(e.to_string()))?;

        self.enviar_nfe_assinada(&xml_assinado, c_uf, rota).await
    }

    /// Envia um XML de NFC-e já assinado (a assinatura e a validação XSD
    /// pré/pós-assinatura ficam a cargo do chamador, que precisa do XML
    /// assinado para persistir o artefato independentemente do resultado
    /// da SEFAZ).
    pub async fn enviar_nfe_assinada(
        &self,
        xml_assinado: &str,
        c_uf: u8,
        rota: Rota<'_>,
    ) -> Result<AutorizacaoResult, TransporteError> {
        let endpoint = rota.endpoint()?;
        let url = endpoint.url(self.ambiente.is_producao());

        let xml_lote = criar_lote_nfe(xml_assinado);
        let envelope = criar_envelope_autorizacao(self.ambiente.tp_amb(), c_uf, &xml_lote);

        let response = self.enviar_soap(url, &envelope).await?;
        Ok(parsear_autorizacao(&response))
    }

    /// Envia um evento (cancelamento, carta de correção) já assinado pela
    /// [`crate::certificado::AssinadorXml`]. Reaproveita a mesma tabela de
    /// hosts de `NFeAutorizacao4` — as SEFAZ publicam `NFeRecepcaoEvento4`
    /// num path distinto no mesmo host, mas manter uma segunda tabela de 27
    /// UFs só para o envelope de evento não paga seu peso; caso uma UF
    /// divirja, ela entra aqui como exceção explícita.
    pub async fn enviar_evento_assinado(
        &self,
        xml_evento_assinado: &str,
        c_uf: u8,
        rota: Rota<'_>,
    ) -> Result<AutorizacaoResult, TransporteError> {
        let endpoint = rota.endpoint()?;
        let url = endpoint.url(self.ambiente.is_producao());

        let envelope = criar_envelope_evento(self.ambiente.tp_amb(), c_uf, xml_evento_assinado);
        let response = self.enviar_soap(url, &envelope).await?;
        Ok(parsear_autorizacao(&response))
    }

    async fn enviar_soap(&self, url: &str, envelope: &str) -> Result<String, TransporteError> {
        let response = self
            .http_client
            .post(url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", "")
            .body(envelope.to_string())
            .send()
            .await
            .map_err(|e| TransporteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransporteError::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(|e| TransporteError::Transport(e.to_string()))
    }
}

fn criar_lote_nfe(xml_nfe: &str) -> String {
    format!(
        r#"<enviNFe versao="4.00" xmlns="http://www.portalfiscal.inf.br/nfe"><idLote>1</idLote><indSinc>1</indSinc>{xml_nfe}</enviNFe>"#
    )
}

fn criar_envelope_autorizacao(tp_amb: &str, c_uf: u8, xml_lote: &str) -> String {
    let _ = tp_amb; // tpAmb vai dentro do próprio enviNFe/NFe, o cabecMsg só carrega cUF+versaoDados
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soap12:Envelope xmlns:soap12="http://www.w3.org/2003/05/soap-envelope"><soap12:Header><nfeCabecMsg xmlns="http://www.portalfiscal.inf.br/nfe/wsdl/NFeAutorizacao4"><cUF>{c_uf}</cUF><versaoDados>4.00</versaoDados></nfeCabecMsg></soap12:Header><soap12:Body><nfeDadosMsg xmlns="http://www.portalfiscal.inf.br/nfe/wsdl/NFeAutorizacao4">{xml_lote}</nfeDadosMsg></soap12:Body></soap12:Envelope>"#
    )
}

fn criar_envelope_evento(tp_amb: &str, c_uf: u8, xml_evento: &str) -> String {
    let _ = tp_amb;
    let envi_evento = format!(
        r#"<envEvento versao="1.00" xmlns="http://www.portalfiscal.inf.br/nfe"><idLote>1</idLote>{xml_evento}</envEvento>"#
    );
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soap12:Envelope xmlns:soap12="http://www.w3.org/2003/05/soap-envelope"><soap12:Header><nfeCabecMsg xmlns="http://www.portalfiscal.inf.br/nfe/wsdl/NFeRecepcaoEvento4"><cUF>{c_uf}</cUF><versaoDados>1.00</versaoDados></nfeCabecMsg></soap12:Header><soap12:Body><nfeDadosMsg xmlns="http://www.portalfiscal.inf.br/nfe/wsdl/NFeRecepcaoEvento4">{envi_evento}</nfeDadosMsg></soap12:Body></soap12:Envelope>"#
    )
}

fn parsear_autorizacao(xml: &str) -> AutorizacaoResult {
    let cstat: u16 = extract_xml_value(xml, "cStat").and_then(|s| s.parse().ok()).unwrap_or(0);
    let motivo = extract_xml_value(xml, "xMotivo").unwrap_or_default();
    let protocolo = extract_xml_value(xml, "nProt");

    AutorizacaoResult {
        cstat,
        motivo,
        protocolo,
        outcome_raw: format!("{:?}", classify(cstat)),
    }
}

fn extract_xml_value(xml: &str, tag: &str) -> Option<String> {
    let start_tag = format!("<{}>", tag);
    let end_tag = format!("</{}>", tag);
    let start = xml.find(&start_tag)?;
    let value_start = start + start_tag.len();
    let end = xml[value_start..].find(&end_tag)?;
    Some(xml[value_start..value_start + end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifica_autorizado() {
        assert_eq!(classify(100), SefazOutcome::Autorizado);
        assert_eq!(classify(150), SefazOutcome::Autorizado);
    }

    #[test]
    fn classifica_indisponivel_dispara_contingencia() {
        assert!(classify(108).triggers_contingency());
        assert!(classify(691).triggers_contingency());
    }

    #[test]
    fn classifica_erro_servidor_como_transiente_nao_terminal() {
        let outcome = classify(550);
        assert_eq!(outcome, SefazOutcome::ErroServidor);
        assert!(!outcome.is_terminal());
    }

    #[test]
    fn classifica_duplicidade_como_terminal() {
        assert!(classify(539).is_terminal());
        assert!(classify(204).is_terminal());
    }

    #[test]
    fn extrai_valor_simples_do_xml() {
        let xml = "<root><cStat>100</cStat><xMotivo>Autorizado</xMotivo></root>";
        assert_eq!(extract_xml_value(xml, "cStat").as_deref(), Some("100"));
        assert_eq!(extract_xml_value(xml, "xMotivo").as_deref(), Some("Autorizado"));
    }
}

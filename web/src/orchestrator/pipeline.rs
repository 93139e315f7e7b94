//! Pipeline de emissão (C6): constrói, assina, valida e envia a NFC-e,
//! interpretando a resposta da SEFAZ como uma transição de estado.
//!
//! Sem precedente direto no teacher — que é uma biblioteca de parse/build
//! síncrona mais uma camada web fina, sem fila, sem máquina de estados e sem
//! retry — este módulo é construído a partir de `SefazClient`/`AssinadorXml`/
//! `CertificadoA1` (os passos que ele de fato conduz) e do padrão sqlx de
//! `web/src/db` generalizado para as tabelas de orquestração.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use uuid::Uuid;

use nfce_core::{CofinsRegime, Endereco, IcmsRegime, ItemBuilder, NfeBuilder, PisRegime, TipoAmbiente, TipoEmissao};

use crate::certificado::{AssinadorXml, CertificadoA1};
use crate::certificado::assinatura::validar_xsd;
use crate::config::Config;
use crate::db::{PostgresClient, RequestStatus};
use crate::error::OrchestratorError;
use crate::pdf::{gerar_danfe, DanfeEmitente, DanfeInput, DanfeItem, DanfeTotais};
use crate::sefaz::{self, AmbienteNfe, AutorizacaoResult, Rota, SefazClient, SefazOutcome};
use crate::storage::{upload_artifacts, ArtifactKeys, StorageClient};

use super::retry;

/// Caminhos dos schemas XSD usados no pipeline, resolvidos uma única vez
/// por `schema_dir` e cacheados em um mapa concorrente.
static SCHEMA_PATHS: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

fn nfce_schema_path(schema_dir: &str) -> String {
    SCHEMA_PATHS
        .entry(schema_dir.to_string())
        .or_insert_with(|| format!("{}/nfe_v4.00.xsd", schema_dir.trim_end_matches('/')))
        .clone()
}

/// Corpo aceito por `POST /nfce`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EmitInput {
    pub state: String,
    pub environment: Ambiente,
    pub company_id: Uuid,
    pub items: Vec<EmitItem>,
    pub payments: Vec<EmitPayment>,
    #[serde(default)]
    pub options: EmitOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ambiente {
    Producao,
    Homologacao,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EmitItem {
    pub codigo: String,
    pub descricao: String,
    pub ncm: String,
    pub cfop: String,
    pub unidade: String,
    pub quantidade: f32,
    pub valor_unitario: f32,
    #[serde(default)]
    pub gtin: Option<String>,
    #[serde(default)]
    pub valor_desconto: Option<f32>,
    /// Regime tributário do item. Ausente = Simples Nacional CSOSN 102 (o
    /// default de varejo de `ItemBuilder::new`); presente, seleciona
    /// explicitamente a variante de ICMS/PIS/COFINS do item.
    #[serde(default)]
    pub tax: Option<ItemTax>,
}

/// Discriminador de tributação de um item, repassado 1:1 para
/// `IcmsRegime`/`PisRegime`/`CofinsRegime` em `ItemBuilder` — exatamente uma
/// variante de cada bloco é populada no XML final.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ItemTax {
    pub icms: IcmsRegime,
    pub pis: PisRegime,
    pub cofins: CofinsRegime,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EmitPayment {
    pub forma: String,
    pub valor: f32,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct EmitOptions {
    #[serde(default)]
    pub contingency: bool,
    #[serde(default)]
    pub sync: bool,
}

impl EmitInput {
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.items.is_empty() {
            return Err(OrchestratorError::InvalidInput("items deve conter ao menos um item".into()));
        }
        if self.payments.is_empty() {
            return Err(OrchestratorError::InvalidInput("payments deve conter ao menos um pagamento".into()));
        }
        let total_itens: f32 = self
            .items
            .iter()
            .map(|i| i.quantidade * i.valor_unitario - i.valor_desconto.unwrap_or(0.0))
            .sum();
        let total_pago: f32 = self.payments.iter().map(|p| p.valor).sum();
        if (total_itens - total_pago).abs() > 0.01 {
            return Err(OrchestratorError::InvalidInput(format!(
                "soma dos pagamentos ({:.2}) não confere com o total dos itens ({:.2})",
                total_pago, total_itens
            )));
        }
        Ok(())
    }
}

/// Dados do emissor, hoje externos ao core (tabela `companies`, "owned
/// externally") — carregados pelo chamador e repassados ao
/// orquestrador sem serem persistidos por ele.
#[derive(Clone)]
pub struct IssuerProfile {
    pub company_id: Uuid,
    pub cnpj: String,
    pub razao_social: String,
    pub nome_fantasia: Option<String>,
    pub ie: String,
    pub endereco: Endereco,
    pub codigo_municipio: u32,
    pub csc: String,
    pub id_token_csc: String,
    pub certificado: CertificadoA1,
}

/// Resultado terminal de uma tentativa de emissão, para quem disparou o
/// processamento (consumidor AMQP ou caminho síncrono da API).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    Authorized,
    Rejected,
    Retrying,
    Contingency,
    AlreadyAuthorized,
    LostRace,
}

/// Orquestrador de emissão: mantém as dependências de infraestrutura e
/// implementa o pipeline completo de emissão.
pub struct Orchestrator {
    pub db: Arc<PostgresClient>,
    pub storage: Arc<StorageClient>,
    pub config: Arc<Config>,
}

impl Orchestrator {
    pub fn new(db: Arc<PostgresClient>, storage: Arc<StorageClient>, config: Arc<Config>) -> Self {
        Self { db, storage, config }
    }

    /// Processa uma tentativa de emissão para `request_id`. Chamado pelo
    /// consumidor AMQP da fila `nfce.emit` (ou diretamente, em testes/modo
    /// síncrono). `issuer` é resolvido pelo chamador a partir do registro
    /// externo da empresa.
    pub async fn process_emission(
        &self,
        request_id: Uuid,
        issuer: &IssuerProfile,
    ) -> Result<EmitOutcome, OrchestratorError> {
        let row = self
            .db
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| OrchestratorError::InvalidInput("requisição não encontrada".into()))?;

        // Idempotência na retomada pelo worker: já autorizada, nada a fazer.
        if row.status == RequestStatus::Authorized {
            return Ok(EmitOutcome::AlreadyAuthorized);
        }

        let now = Utc::now();
        if retry::deadline_exceeded(row.created_at, now) {
            self.reject_with_synthetic_999(request_id, row.status, "prazo de 48h excedido").await?;
            return Ok(EmitOutcome::Rejected);
        }

        let from_status = row.status;
        let Some(row) = self.db.cas_status(request_id, from_status, RequestStatus::Processing).await? else {
            // Outro worker já tomou posse desta requisição.
            return Ok(EmitOutcome::LostRace);
        };

        let input: EmitInput = serde_json::from_value(row.payload.clone())
            .map_err(|e| OrchestratorError::InvalidInput(e.to_string()))?;
        input.validate()?;

        let uf = nfce_core::estados::por_sigla(&input.state)?;
        let series = 1i32;
        let numero = self.db.allocate_sequence(issuer.company_id, series).await? as u32;

        let mut tipo_emissao = TipoEmissao::Normal;
        let mut rota = Rota::Estado(uf.sigla);
        if row.contingency {
            let contingencia_svc_rs = row.contingency_type.as_deref() == Some("svc_rs");
            tipo_emissao = if contingencia_svc_rs { TipoEmissao::ContingenciaSvcRs } else { TipoEmissao::ContingenciaSvcAn };
            rota = if contingencia_svc_rs { Rota::SvcRs } else { Rota::SvcAn };
        }

        let nfe = self.build_nfe(&input, issuer, uf.codigo, series, numero, tipo_emissao)?;
        let xml = nfe.to_string();

        let schema_path = nfce_schema_path(&self.config.schema_dir);
        validar_xsd(&xml, &schema_path).map_err(|e| OrchestratorError::InvalidInput(e.to_string()))?;

        issuer.certificado.checar_validade().map_err(|_| OrchestratorError::CertExpired)?;

        let assinador = AssinadorXml::new(issuer.certificado.clone());
        let xml_assinado = assinador
            .assinar_nfe(&xml)
            .map_err(|e| OrchestratorError::SignFailed(e.to_string()))?;
        validar_xsd(&xml_assinado, &schema_path).map_err(|e| OrchestratorError::InvalidInput(e.to_string()))?;

        let ambiente_nfe = match input.environment {
            Ambiente::Producao => AmbienteNfe::Producao,
            Ambiente::Homologacao => AmbienteNfe::Homologacao,
        };

        let client = SefazClient::new(issuer.certificado.clone(), ambiente_nfe, self.config.sefaz_timeout)
            .map_err(|e| OrchestratorError::SefazTransient(e.to_string()))?;

        let resultado = match client.enviar_nfe_assinada(&xml_assinado, uf.codigo, rota).await {
            Ok(r) => r,
            Err(e) if e.is_transient() => {
                return self.schedule_retry_or_give_up(request_id, row.retry_count, row.created_at, &e.to_string()).await;
            }
            Err(e) => {
                self.reject_with_synthetic_999(request_id, RequestStatus::Processing, &e.to_string()).await?;
                return Ok(EmitOutcome::Rejected);
            }
        };

        self.apply_outcome(request_id, &row, &input, issuer, &nfe, &xml_assinado, resultado, uf.sigla).await
    }

    fn build_nfe(
        &self,
        input: &EmitInput,
        issuer: &IssuerProfile,
        codigo_uf: u8,
        series: i32,
        numero: u32,
        tipo_emissao: TipoEmissao,
    ) -> Result<nfce_core::Nfe, OrchestratorError> {
        let mut builder = NfeBuilder::new()
            .codigo_uf(codigo_uf)
            .numero(numero)
            .serie(series as u16)
            .natureza_operacao("VENDA DE MERCADORIA")
            .codigo_municipio(issuer.codigo_municipio)
            .ambiente(match input.environment {
                Ambiente::Producao => TipoAmbiente::Producao,
                Ambiente::Homologacao => TipoAmbiente::Homologacao,
            })
            .tipo_emissao(tipo_emissao)
            .emit_cnpj(&issuer.cnpj)
            .emit_razao_social(&issuer.razao_social)
            .emit_ie(&issuer.ie)
            .emit_endereco(issuer.endereco.clone());

        if let Some(fantasia) = &issuer.nome_fantasia {
            builder = builder.emit_nome_fantasia(fantasia);
        }

        for item in &input.items {
            let mut item_builder = ItemBuilder::new(&item.codigo, &item.descricao, &item.ncm, &item.cfop)
                .unidade(&item.unidade)
                .quantidade(item.quantidade)
                .valor_unitario(item.valor_unitario);
            if let Some(gtin) = &item.gtin {
                item_builder = item_builder.gtin(gtin);
            }
            if let Some(desconto) = item.valor_desconto {
                item_builder = item_builder.desconto(desconto);
            }
            if let Some(tax) = &item.tax {
                item_builder = item_builder
                    .icms(tax.icms.clone())
                    .pis(tax.pis.clone())
                    .cofins(tax.cofins.clone());
            }
            builder = builder.add_item(item_builder);
        }

        let codigo_numerico = nfce_core::chave_acesso::gerar_codigo_numerico();
        builder.build_em(Utc::now(), codigo_numerico).map_err(OrchestratorError::from)
    }

    async fn apply_outcome(
        &self,
        request_id: Uuid,
        row: &crate::db::RequestRow,
        input: &EmitInput,
        issuer: &IssuerProfile,
        nfe: &nfce_core::Nfe,
        xml_assinado: &str,
        resultado: AutorizacaoResult,
        uf_sigla: &str,
    ) -> Result<EmitOutcome, OrchestratorError> {
        let outcome = sefaz::classify(resultado.cstat);

        match outcome {
            SefazOutcome::Autorizado => {
                self.authorize(request_id, input, issuer, nfe, xml_assinado, &resultado, uf_sigla).await?;
                Ok(EmitOutcome::Authorized)
            }
            SefazOutcome::NegadoPermanente
            | SefazOutcome::ViolacaoRegraNegocio
            | SefazOutcome::DuplicidadeOuTiming
            | SefazOutcome::IrregularidadeFiscal
            | SefazOutcome::SchemaNegado => {
                self.db
                    .set_rejected(
                        request_id,
                        &resultado.cstat.to_string(),
                        &resultado.motivo,
                        Some(resultado.cstat as i32),
                    )
                    .await?;
                self.db
                    .cas_status(request_id, RequestStatus::Processing, RequestStatus::Rejected)
                    .await?;
                self.db
                    .append_event(
                        request_id,
                        Some(RequestStatus::Processing),
                        RequestStatus::Rejected,
                        Some(resultado.cstat as i32),
                        Some(&resultado.motivo),
                        serde_json::json!({}),
                    )
                    .await?;
                Ok(EmitOutcome::Rejected)
            }
            SefazOutcome::ServicoIndisponivel if !row.contingency => {
                let contingency_type = if uf_sigla.eq_ignore_ascii_case("RS") { "svc_rs" } else { "svc_an" };
                self.db
                    .cas_status(request_id, RequestStatus::Processing, RequestStatus::Contingency)
                    .await?;
                sqlx::query("UPDATE nfce_requests SET contingency = TRUE, contingency_type = $2, updated_at = now() WHERE id = $1")
                    .bind(request_id)
                    .bind(contingency_type)
                    .execute(self.db.pool())
                    .await?;
                self.db
                    .append_event(
                        request_id,
                        Some(RequestStatus::Processing),
                        RequestStatus::Contingency,
                        Some(resultado.cstat as i32),
                        Some(&resultado.motivo),
                        serde_json::json!({ "contingency_type": contingency_type }),
                    )
                    .await?;
                self.db
                    .cas_status(request_id, RequestStatus::Contingency, RequestStatus::Processing)
                    .await?;
                self.db
                    .append_event(
                        request_id,
                        Some(RequestStatus::Contingency),
                        RequestStatus::Processing,
                        None,
                        Some("reentrando no pipeline em contingência"),
                        serde_json::json!({}),
                    )
                    .await?;
                Ok(EmitOutcome::Contingency)
            }
            SefazOutcome::ServicoIndisponivel | SefazOutcome::ErroServidor | SefazOutcome::Desconhecido => {
                self.schedule_retry_or_give_up(request_id, row.retry_count, row.created_at, &resultado.motivo).await
            }
        }
    }

    async fn schedule_retry_or_give_up(
        &self,
        request_id: Uuid,
        retry_count: i32,
        created_at: chrono::DateTime<Utc>,
        reason: &str,
    ) -> Result<EmitOutcome, OrchestratorError> {
        let now = Utc::now();
        if retry_count as u32 >= self.config.max_retries || retry::deadline_exceeded(created_at, now) {
            self.reject_with_synthetic_999(request_id, RequestStatus::Processing, reason).await?;
            return Ok(EmitOutcome::Rejected);
        }

        let next_count = retry_count + 1;
        let next_retry_at = retry::next_retry_at(now, next_count as u32);
        self.db.set_retry_schedule(request_id, next_count, next_retry_at).await?;
        self.db
            .cas_status(request_id, RequestStatus::Processing, RequestStatus::Retrying)
            .await?;
        self.db
            .append_event(
                request_id,
                Some(RequestStatus::Processing),
                RequestStatus::Retrying,
                None,
                Some(reason),
                serde_json::json!({ "retry_count": next_count, "next_retry_at": next_retry_at }),
            )
            .await?;
        Ok(EmitOutcome::Retrying)
    }

    async fn reject_with_synthetic_999(
        &self,
        request_id: Uuid,
        from_status: RequestStatus,
        reason: &str,
    ) -> Result<(), OrchestratorError> {
        self.db.set_rejected(request_id, "999", reason, None).await?;
        self.db.cas_status(request_id, from_status, RequestStatus::Rejected).await?;
        self.db
            .append_event(
                request_id,
                Some(from_status),
                RequestStatus::Rejected,
                Some(999),
                Some(reason),
                serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    async fn authorize(
        &self,
        request_id: Uuid,
        input: &EmitInput,
        issuer: &IssuerProfile,
        nfe: &nfce_core::Nfe,
        xml_assinado: &str,
        resultado: &AutorizacaoResult,
        uf_sigla: &str,
    ) -> Result<(), OrchestratorError> {
        let protocolo = resultado.protocolo.clone().unwrap_or_default();

        self.db
            .set_authorized(
                request_id,
                &nfe.chave_acesso,
                &protocolo,
                nfe.ide.numero as i64,
                nfe.ide.serie as i32,
                None,
                None,
                None,
            )
            .await?;
        self.db
            .cas_status(request_id, RequestStatus::Processing, RequestStatus::Authorized)
            .await?;
        self.db
            .append_event(
                request_id,
                Some(RequestStatus::Processing),
                RequestStatus::Authorized,
                Some(resultado.cstat as i32),
                Some(&resultado.motivo),
                serde_json::json!({ "protocolo": protocolo }),
            )
            .await?;

        self.persist_artifacts(request_id, input, issuer, nfe, xml_assinado, uf_sigla).await;

        Ok(())
    }

    /// Gera e envia os três artefatos. Falhas aqui são não-fatais
    /// para a autorização em si: a chave já foi persistida como fallback.
    async fn persist_artifacts(
        &self,
        request_id: Uuid,
        input: &EmitInput,
        issuer: &IssuerProfile,
        nfe: &nfce_core::Nfe,
        xml_assinado: &str,
        uf_sigla: &str,
    ) {
        let keys = ArtifactKeys::for_access_key(&issuer.company_id.to_string(), &nfe.chave_acesso);

        let qr_payload = nfce_core::QrCodePayload {
            chave_acesso: nfe.chave_acesso.clone(),
            tipo_ambiente: match input.environment {
                Ambiente::Producao => 1,
                Ambiente::Homologacao => 2,
            },
            destinatario_documento: nfe.dest.as_ref().map(|d| d.cnpj.clone()),
            data_emissao: nfe.ide.emissao.horario,
            valor_total: nfe.totais.valor_total as f64,
            valor_icms: nfe.totais.valor_icms as f64,
            digest_value: extract_digest_value(xml_assinado).unwrap_or_default(),
            id_token_csc: issuer.id_token_csc.clone(),
            csc: issuer.csc.clone(),
        };
        let qr_url = qr_payload.gerar_url(&sefaz::endpoints::qr_portal_url(uf_sigla));
        let qr_png = match rasterize_qr(&qr_url) {
            Ok(png) => png,
            Err(e) => {
                tracing::warn!(request_key = %nfe.chave_acesso, error = %e, "falha ao rasterizar QR code");
                Vec::new()
            }
        };

        let danfe_input = build_danfe_input(input, issuer, nfe, resultado_protocolo(nfe));
        let pdf_bytes = gerar_danfe(&danfe_input).unwrap_or_default();

        let results = upload_artifacts(&self.storage, &keys, xml_assinado.as_bytes(), &pdf_bytes, &qr_png).await;

        let mut xml_url = None;
        let mut pdf_url = None;
        let mut qr_url = None;
        for (artifact, result) in results {
            match result {
                Ok(()) => {
                    let url = self.storage.public_url(match artifact {
                        "xml" => &keys.xml,
                        "pdf" => &keys.pdf,
                        _ => &keys.qr,
                    });
                    match artifact {
                        "xml" => xml_url = Some(url),
                        "pdf" => pdf_url = Some(url),
                        _ => qr_url = Some(url),
                    }
                }
                Err(e) => {
                    tracing::warn!(request_key = %nfe.chave_acesso, artifact, error = %e, "falha ao enviar artefato, usando URL prevista");
                }
            }
        }

        if let Err(e) = self
            .db
            .set_artifact_urls(request_id, xml_url.as_deref(), pdf_url.as_deref(), qr_url.as_deref())
            .await
        {
            tracing::warn!(request_id = %request_id, error = %e, "falha ao persistir URLs de artefatos");
        }
    }
}

fn resultado_protocolo(_nfe: &nfce_core::Nfe) -> Option<String> {
    None
}

fn build_danfe_input(
    input: &EmitInput,
    issuer: &IssuerProfile,
    nfe: &nfce_core::Nfe,
    protocolo: Option<String>,
) -> DanfeInput {
    DanfeInput {
        chave_acesso: nfe.chave_acesso.clone(),
        numero: nfe.ide.numero,
        serie: nfe.ide.serie,
        data_emissao: nfe.ide.emissao.horario.to_rfc3339(),
        natureza_operacao: nfe.ide.operacao.natureza.clone(),
        protocolo,
        data_autorizacao: Some(Utc::now().to_rfc3339()),
        emitente: DanfeEmitente {
            cnpj: issuer.cnpj.clone(),
            razao_social: issuer.razao_social.clone(),
            nome_fantasia: issuer.nome_fantasia.clone(),
            inscricao_estadual: Some(issuer.ie.clone()),
            endereco: format!("{}, {}", issuer.endereco.logradouro, issuer.endereco.numero),
            municipio: issuer.endereco.nome_municipio.clone(),
            uf: input.state.clone(),
            cep: issuer.endereco.cep.clone(),
            telefone: issuer.endereco.telefone.clone(),
        },
        destinatario: None,
        itens: input
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| DanfeItem {
                numero: (idx + 1) as u32,
                codigo: item.codigo.clone(),
                descricao: item.descricao.clone(),
                ncm: item.ncm.clone(),
                cfop: item.cfop.clone(),
                unidade: item.unidade.clone(),
                quantidade: item.quantidade as f64,
                valor_unitario: item.valor_unitario as f64,
                valor_total: (item.quantidade * item.valor_unitario) as f64,
            })
            .collect(),
        totais: DanfeTotais {
            base_calculo_icms: nfe.totais.valor_base_calculo as f64,
            valor_icms: nfe.totais.valor_icms as f64,
            base_calculo_st: nfe.totais.valor_base_calculo_st as f64,
            valor_st: nfe.totais.valor_icms_st as f64,
            valor_produtos: nfe.totais.valor_produtos as f64,
            valor_frete: nfe.totais.valor_frete as f64,
            valor_seguro: nfe.totais.valor_seguro as f64,
            valor_desconto: nfe.totais.valor_desconto as f64,
            valor_ipi: nfe.totais.valor_ipi as f64,
            valor_total: nfe.totais.valor_total as f64,
        },
        transporte: None,
        informacoes_complementares: nfe.informacao_complementar.clone(),
    }
}

fn extract_digest_value(xml: &str) -> Option<String> {
    let doc = roxmltree::Document::parse(xml).ok()?;
    doc.descendants()
        .find(|n| n.has_tag_name("DigestValue"))
        .and_then(|n| n.text())
        .map(|s| s.to_string())
}

/// Rasteriza a URL do QR Code em PNG, usando as crates `qrcode` +
/// `image` (grounded em `Ooriginador-GIRO/apps/desktop/src-tauri/Cargo.toml`,
/// o único manifesto do pacote que gera QR codes).
fn rasterize_qr(data: &str) -> Result<Vec<u8>, String> {
    use image::{ImageBuffer, Luma};
    use qrcode::QrCode;

    let code = QrCode::new(data.as_bytes()).map_err(|e| e.to_string())?;
    let image = code.render::<Luma<u8>>().min_dimensions(300, 300).build();

    let buffer: ImageBuffer<Luma<u8>, Vec<u8>> = image;
    let mut png_bytes = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut png_bytes);
        buffer
            .write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|e| e.to_string())?;
    }
    Ok(png_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_valido() -> EmitInput {
        EmitInput {
            state: "SP".to_string(),
            environment: Ambiente::Homologacao,
            company_id: Uuid::new_v4(),
            items: vec![EmitItem {
                codigo: "P1".to_string(),
                descricao: "Produto".to_string(),
                ncm: "12345678".to_string(),
                cfop: "5102".to_string(),
                unidade: "UN".to_string(),
                quantidade: 1.0,
                valor_unitario: 10.0,
                gtin: None,
                valor_desconto: None,
                tax: None,
            }],
            payments: vec![EmitPayment { forma: "01".to_string(), valor: 10.0 }],
            options: EmitOptions::default(),
        }
    }

    #[test]
    fn valida_input_consistente() {
        assert!(input_valido().validate().is_ok());
    }

    #[test]
    fn rejeita_sem_itens() {
        let mut input = input_valido();
        input.items.clear();
        assert!(input.validate().is_err());
    }

    #[test]
    fn rejeita_pagamento_que_nao_confere_com_total() {
        let mut input = input_valido();
        input.payments[0].valor = 5.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn nfce_schema_path_e_cacheado_por_diretorio() {
        let p1 = nfce_schema_path("./schemas");
        let p2 = nfce_schema_path("./schemas");
        assert_eq!(p1, p2);
        assert!(p1.ends_with("nfe_v4.00.xsd"));
    }

    #[test]
    fn item_tax_seleciona_o_regime_explicito_na_desserializacao() {
        let mut input = input_valido();
        input.items[0].tax = Some(ItemTax {
            icms: IcmsRegime::Tributada00 { origem: 0, modalidade_bc: 3, valor_bc: 10.0, aliquota: 18.0, valor: 1.8 },
            pis: PisRegime::Aliquota { cst: "01".to_string(), valor_bc: 10.0, aliquota: 1.65, valor: 0.17 },
            cofins: CofinsRegime::Aliquota { cst: "01".to_string(), valor_bc: 10.0, aliquota: 7.6, valor: 0.76 },
        });

        let json = serde_json::to_value(&input).unwrap();
        let roundtrip: EmitInput = serde_json::from_value(json).unwrap();
        match &roundtrip.items[0].tax {
            Some(tax) => assert!(matches!(tax.icms, IcmsRegime::Tributada00 { .. })),
            None => panic!("regime tributário não sobreviveu ao round-trip JSON"),
        }
    }

    #[test]
    fn item_sem_tax_usa_default_do_item_builder_na_construcao_do_xml() {
        let input = input_valido();
        assert!(input.items[0].tax.is_none());
    }
}

//! Builder para criação de NFC-e
//!
//! Fornece uma API fluente para construir uma NFC-e (modelo 65) a partir dos
//! dados normalizados de um pedido de emissão, recalculando sempre os totais
//! a partir dos itens informados.

use crate::base::dest::{Destinatario, IndicadorContribuicaoIe};
use crate::base::emit::Emitente;
use crate::base::endereco::Endereco;
use crate::base::ide::*;
use crate::base::item::{
    CofinsAliq, CofinsContainer, CofinsNt, CofinsOutr, Icms00, Icms10, Icms20, IcmsContainer,
    IcmsSn101, IcmsSn102, Imposto, Item, PisAliq, PisContainer, PisNt, PisOutr, Produto,
};
use crate::base::totais::Totalizacao;
use crate::base::transporte::{ModalidadeFrete, Transporte};
use crate::base::{Nfe, VersaoLayout};
use crate::chave_acesso::{self, ComponentesChave};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tributação de ICMS selecionada para um item — exatamente uma variante é
/// serializada por `NfeBuilder::build_em`, igual ao layout de `IcmsContainer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum IcmsRegime {
    /// CST 00 - tributação integral.
    Tributada00 {
        origem: u8,
        modalidade_bc: u8,
        valor_bc: f32,
        aliquota: f32,
        valor: f32,
    },
    /// CST 10 - tributada com cobrança de ICMS por substituição tributária.
    ComSt10 {
        origem: u8,
        modalidade_bc: u8,
        valor_bc: f32,
        aliquota: f32,
        valor: f32,
    },
    /// CST 20 - com redução de base de cálculo.
    ComReducaoBc20 {
        origem: u8,
        modalidade_bc: u8,
        percentual_reducao_bc: f32,
        valor_bc: f32,
        aliquota: f32,
        valor: f32,
    },
    /// CSOSN 101 - Simples Nacional com crédito de ICMS.
    SimplesNacional101 {
        origem: u8,
        csosn: String,
        aliquota_credito_sn: f32,
        valor_credito_icms_sn: f32,
    },
    /// CSOSN 102/103/300/400 - Simples Nacional sem crédito.
    SimplesNacional102 { origem: u8, csosn: String },
}

impl IcmsRegime {
    fn valor(&self) -> f32 {
        match self {
            Self::Tributada00 { valor, .. } | Self::ComSt10 { valor, .. } | Self::ComReducaoBc20 { valor, .. } => *valor,
            Self::SimplesNacional101 { .. } | Self::SimplesNacional102 { .. } => 0.0,
        }
    }
}

/// Tributação de PIS selecionada para um item, espelhando `PisContainer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum PisRegime {
    /// CST 01/02 - tributado por alíquota.
    Aliquota { cst: String, valor_bc: f32, aliquota: f32, valor: f32 },
    /// CST 04 a 09 - não tributado.
    NaoTributado { cst: String },
    /// Outras operações (sem incidência, isenção ou regime cumulativo simplificado).
    Outras {
        cst: String,
        #[serde(default)]
        valor_bc: Option<f32>,
        #[serde(default)]
        aliquota: Option<f32>,
        #[serde(default)]
        valor: Option<f32>,
    },
}

impl PisRegime {
    fn valor(&self) -> f32 {
        match self {
            Self::Aliquota { valor, .. } => *valor,
            Self::NaoTributado { .. } => 0.0,
            Self::Outras { valor, .. } => valor.unwrap_or(0.0),
        }
    }
}

/// Tributação de COFINS selecionada para um item, espelhando `CofinsContainer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum CofinsRegime {
    Aliquota { cst: String, valor_bc: f32, aliquota: f32, valor: f32 },
    NaoTributado { cst: String },
    Outras {
        cst: String,
        #[serde(default)]
        valor_bc: Option<f32>,
        #[serde(default)]
        aliquota: Option<f32>,
        #[serde(default)]
        valor: Option<f32>,
    },
}

impl CofinsRegime {
    fn valor(&self) -> f32 {
        match self {
            Self::Aliquota { valor, .. } => *valor,
            Self::NaoTributado { .. } => 0.0,
            Self::Outras { valor, .. } => valor.unwrap_or(0.0),
        }
    }
}

/// Builder para construção de uma NFC-e.
#[derive(Debug, Default)]
pub struct NfeBuilder {
    codigo_uf: Option<u8>,
    numero: Option<u32>,
    serie: Option<u16>,
    natureza_operacao: Option<String>,
    ambiente: Option<TipoAmbiente>,
    codigo_municipio: Option<u32>,
    tipo_emissao: Option<TipoEmissao>,

    emit_cnpj: Option<String>,
    emit_razao_social: Option<String>,
    emit_nome_fantasia: Option<String>,
    emit_ie: Option<String>,
    emit_endereco: Option<Endereco>,

    dest_cnpj: Option<String>,
    dest_razao_social: Option<String>,
    dest_indicador_ie: Option<IndicadorContribuicaoIe>,
    dest_endereco: Option<Endereco>,

    itens: Vec<ItemBuilder>,

    modalidade_frete: Option<ModalidadeFrete>,

    informacao_complementar: Option<String>,
}

/// Builder para itens da NFC-e.
#[derive(Debug, Clone)]
pub struct ItemBuilder {
    pub codigo: String,
    pub descricao: String,
    pub ncm: String,
    pub cfop: String,
    pub unidade: String,
    pub quantidade: f32,
    pub valor_unitario: f32,
    pub gtin: Option<String>,
    pub valor_desconto: Option<f32>,
    pub icms: IcmsRegime,
    pub pis: PisRegime,
    pub cofins: CofinsRegime,
}

/// Erros de construção da NFC-e.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ErroConstrucao {
    #[error("campo obrigatório ausente: {0}")]
    CampoObrigatorio(&'static str),
    #[error("nenhum item informado para a nota")]
    SemItens,
    #[error("UF desconhecida: {0}")]
    UfDesconhecida(String),
}

impl NfeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn codigo_uf(mut self, uf: u8) -> Self {
        self.codigo_uf = Some(uf);
        self
    }

    pub fn numero(mut self, numero: u32) -> Self {
        self.numero = Some(numero);
        self
    }

    pub fn serie(mut self, serie: u16) -> Self {
        self.serie = Some(serie);
        self
    }

    pub fn natureza_operacao(mut self, natureza: &str) -> Self {
        self.natureza_operacao = Some(natureza.to_string());
        self
    }

    pub fn ambiente(mut self, ambiente: TipoAmbiente) -> Self {
        self.ambiente = Some(ambiente);
        self
    }

    pub fn codigo_municipio(mut self, codigo: u32) -> Self {
        self.codigo_municipio = Some(codigo);
        self
    }

    /// Define o tipo de emissão (1=Normal, 9=Contingência offline); usado
    /// pelo orquestrador ao recalcular a chave em fallback de contingência.
    pub fn tipo_emissao(mut self, tipo: TipoEmissao) -> Self {
        self.tipo_emissao = Some(tipo);
        self
    }

    pub fn emit_cnpj(mut self, cnpj: &str) -> Self {
        self.emit_cnpj = Some(somente_digitos(cnpj));
        self
    }

    pub fn emit_razao_social(mut self, razao: &str) -> Self {
        self.emit_razao_social = Some(razao.to_string());
        self
    }

    pub fn emit_nome_fantasia(mut self, fantasia: &str) -> Self {
        self.emit_nome_fantasia = Some(fantasia.to_string());
        self
    }

    pub fn emit_ie(mut self, ie: &str) -> Self {
        self.emit_ie = Some(ie.to_string());
        self
    }

    pub fn emit_endereco(mut self, endereco: Endereco) -> Self {
        self.emit_endereco = Some(endereco);
        self
    }

    pub fn dest_cnpj(mut self, cnpj: &str) -> Self {
        self.dest_cnpj = Some(somente_digitos(cnpj));
        self
    }

    pub fn dest_razao_social(mut self, razao: &str) -> Self {
        self.dest_razao_social = Some(razao.to_string());
        self
    }

    pub fn dest_indicador_ie(mut self, indicador: IndicadorContribuicaoIe) -> Self {
        self.dest_indicador_ie = Some(indicador);
        self
    }

    pub fn dest_endereco(mut self, endereco: Endereco) -> Self {
        self.dest_endereco = Some(endereco);
        self
    }

    pub fn add_item(mut self, item: ItemBuilder) -> Self {
        self.itens.push(item);
        self
    }

    pub fn modalidade_frete(mut self, modalidade: ModalidadeFrete) -> Self {
        self.modalidade_frete = Some(modalidade);
        self
    }

    pub fn informacao_complementar(mut self, info: &str) -> Self {
        self.informacao_complementar = Some(info.to_string());
        self
    }

    /// Constrói a NFC-e, recalculando a chave de acesso e os totais a
    /// partir dos itens informados. `agora` e `codigo_numerico` são
    /// injetados pelo chamador para manter o builder determinístico e
    /// testável (o orquestrador os gera uma única vez por tentativa).
    pub fn build_em(
        self,
        agora: DateTime<Utc>,
        codigo_numerico: String,
    ) -> Result<Nfe, ErroConstrucao> {
        let codigo_uf = self
            .codigo_uf
            .ok_or(ErroConstrucao::CampoObrigatorio("codigo_uf"))?;
        crate::estados::por_codigo(codigo_uf)
            .map_err(|e| ErroConstrucao::UfDesconhecida(e.0))?;
        let numero = self.numero.ok_or(ErroConstrucao::CampoObrigatorio("numero"))?;
        let serie = self.serie.unwrap_or(1);
        let natureza = self
            .natureza_operacao
            .ok_or(ErroConstrucao::CampoObrigatorio("natureza_operacao"))?;
        let ambiente = self.ambiente.unwrap_or(TipoAmbiente::Homologacao);
        let codigo_mun = self
            .codigo_municipio
            .ok_or(ErroConstrucao::CampoObrigatorio("codigo_municipio"))?;
        let tipo_emissao = self.tipo_emissao.unwrap_or(TipoEmissao::Normal);
        let emit_cnpj = self
            .emit_cnpj
            .clone()
            .ok_or(ErroConstrucao::CampoObrigatorio("emit_cnpj"))?;

        if self.itens.is_empty() {
            return Err(ErroConstrucao::SemItens);
        }

        let mut itens_nfe = Vec::with_capacity(self.itens.len());
        let mut valor_produtos = 0.0f32;
        let mut valor_desconto = 0.0f32;
        let mut valor_icms = 0.0f32;
        let mut valor_pis = 0.0f32;
        let mut valor_cofins = 0.0f32;

        for (idx, item) in self.itens.iter().enumerate() {
            let valor_bruto = item.quantidade * item.valor_unitario;
            valor_produtos += valor_bruto;
            let desconto = item.valor_desconto.unwrap_or(0.0);
            valor_desconto += desconto;
            valor_icms += item.icms.valor();
            valor_pis += item.pis.valor();
            valor_cofins += item.cofins.valor();

            let mut produto = Produto::new(
                item.codigo.clone(),
                item.descricao.clone(),
                item.ncm.clone(),
                item.cfop.clone(),
                item.unidade.clone(),
                item.quantidade,
                item.valor_unitario,
                valor_bruto,
            );
            produto.gtin = item.gtin.clone();
            produto.valor_desconto = item.valor_desconto;

            let icms = match item.icms.clone() {
                IcmsRegime::Tributada00 { origem, modalidade_bc, valor_bc, aliquota, valor } => IcmsContainer {
                    icms00: Some(Icms00 { origem, cst: "00".to_string(), modalidade_bc, valor_bc, aliquota, valor }),
                    icms10: None,
                    icms20: None,
                    icms_sn101: None,
                    icms_sn102: None,
                },
                IcmsRegime::ComSt10 { origem, modalidade_bc, valor_bc, aliquota, valor } => IcmsContainer {
                    icms00: None,
                    icms10: Some(Icms10 { origem, cst: "10".to_string(), modalidade_bc, valor_bc, aliquota, valor }),
                    icms20: None,
                    icms_sn101: None,
                    icms_sn102: None,
                },
                IcmsRegime::ComReducaoBc20 { origem, modalidade_bc, percentual_reducao_bc, valor_bc, aliquota, valor } => IcmsContainer {
                    icms00: None,
                    icms10: None,
                    icms20: Some(Icms20 {
                        origem,
                        cst: "20".to_string(),
                        modalidade_bc,
                        percentual_reducao_bc,
                        valor_bc,
                        aliquota,
                        valor,
                    }),
                    icms_sn101: None,
                    icms_sn102: None,
                },
                IcmsRegime::SimplesNacional101 { origem, csosn, aliquota_credito_sn, valor_credito_icms_sn } => IcmsContainer {
                    icms00: None,
                    icms10: None,
                    icms20: None,
                    icms_sn101: Some(IcmsSn101 { origem, csosn, aliquota_credito_sn, valor_credito_icms_sn }),
                    icms_sn102: None,
                },
                IcmsRegime::SimplesNacional102 { origem, csosn } => IcmsContainer {
                    icms00: None,
                    icms10: None,
                    icms20: None,
                    icms_sn101: None,
                    icms_sn102: Some(IcmsSn102 { origem, csosn }),
                },
            };

            let pis = match item.pis.clone() {
                PisRegime::Aliquota { cst, valor_bc, aliquota, valor } => PisContainer {
                    pis_aliq: Some(PisAliq { cst, valor_bc, aliquota, valor }),
                    pis_nt: None,
                    pis_outr: None,
                },
                PisRegime::NaoTributado { cst } => PisContainer {
                    pis_aliq: None,
                    pis_nt: Some(PisNt { cst }),
                    pis_outr: None,
                },
                PisRegime::Outras { cst, valor_bc, aliquota, valor } => PisContainer {
                    pis_aliq: None,
                    pis_nt: None,
                    pis_outr: Some(PisOutr { cst, valor_bc, aliquota, valor }),
                },
            };

            let cofins = match item.cofins.clone() {
                CofinsRegime::Aliquota { cst, valor_bc, aliquota, valor } => CofinsContainer {
                    cofins_aliq: Some(CofinsAliq { cst, valor_bc, aliquota, valor }),
                    cofins_nt: None,
                    cofins_outr: None,
                },
                CofinsRegime::NaoTributado { cst } => CofinsContainer {
                    cofins_aliq: None,
                    cofins_nt: Some(CofinsNt { cst }),
                    cofins_outr: None,
                },
                CofinsRegime::Outras { cst, valor_bc, aliquota, valor } => CofinsContainer {
                    cofins_aliq: None,
                    cofins_nt: None,
                    cofins_outr: Some(CofinsOutr { cst, valor_bc, aliquota, valor }),
                },
            };

            let imposto = Imposto {
                valor_aproximado_tributos: None,
                icms: Some(icms),
                pis: Some(pis),
                cofins: Some(cofins),
            };

            itens_nfe.push(Item {
                numero: (idx + 1) as u8,
                produto,
                imposto,
            });
        }

        let valor_total = valor_produtos - valor_desconto;

        let aamm = agora.format("%y%m").to_string();
        let componentes = ComponentesChave {
            codigo_uf,
            ano_mes: aamm,
            cnpj_emitente: emit_cnpj.clone(),
            modelo: ModeloDocumentoFiscal::Nfce as u8,
            serie,
            numero,
            tipo_emissao: tipo_emissao as u8,
            codigo_numerico: codigo_numerico.clone(),
        };
        let chave_acesso = chave_acesso::montar_chave(&componentes);
        let dv = chave_acesso
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .unwrap_or(0) as u8;

        let emit_endereco = self.emit_endereco.unwrap_or_default();

        Ok(Nfe {
            versao: VersaoLayout::V4_00,
            chave_acesso,
            ide: Identificacao {
                codigo_uf,
                chave: ComposicaoChaveAcesso {
                    codigo: codigo_numerico,
                    digito_verificador: dv,
                },
                numero,
                serie,
                modelo: ModeloDocumentoFiscal::Nfce,
                emissao: Emissao {
                    horario: agora,
                    tipo: tipo_emissao,
                    finalidade: FinalidadeEmissao::Normal,
                    processo: TipoProcessoEmissao::ViaAplicativoDoContribuinte,
                    versao_processo: env!("CARGO_PKG_VERSION").to_string(),
                },
                operacao: Operacao {
                    horario: None,
                    tipo: TipoOperacao::Saida,
                    destino: DestinoOperacao::Interna,
                    natureza,
                    consumidor: TipoConsumidor::Normal,
                    presenca: TipoPresencaComprador::Presencial,
                    intermediador: None,
                },
                codigo_municipio: codigo_mun,
                formato_danfe: FormatoImpressaoDanfe::Nfce,
                ambiente,
            },
            emit: Emitente {
                cnpj: Some(emit_cnpj),
                razao_social: self.emit_razao_social,
                nome_fantasia: self.emit_nome_fantasia,
                ie: self.emit_ie,
                iest: None,
                endereco: emit_endereco,
            },
            dest: self.dest_cnpj.map(|cnpj| Destinatario {
                cnpj,
                razao_social: self.dest_razao_social,
                indicador_ie: self
                    .dest_indicador_ie
                    .unwrap_or(IndicadorContribuicaoIe::NaoContribuinteIe),
                ie: None,
                endereco: self.dest_endereco,
            }),
            itens: itens_nfe,
            totais: Totalizacao {
                valor_base_calculo: 0.0,
                valor_icms,
                valor_icms_desonerado: 0.0,
                valor_fcp: 0.0,
                valor_base_calculo_st: 0.0,
                valor_icms_st: 0.0,
                valor_fcp_st: 0.0,
                valor_fcp_st_retido: 0.0,
                valor_produtos,
                valor_frete: 0.0,
                valor_seguro: 0.0,
                valor_desconto,
                valor_outros: 0.0,
                valor_ipi: 0.0,
                valor_ipi_devolvido: 0.0,
                valor_ii: 0.0,
                valor_pis,
                valor_cofins,
                valor_total,
                valor_aproximado_tributos: 0.0,
                valor_fcp_uf_dest: 0.0,
                valor_icms_uf_dest: 0.0,
                valor_icms_uf_remet: 0.0,
            },
            transporte: Transporte {
                modalidade: self
                    .modalidade_frete
                    .unwrap_or(ModalidadeFrete::semTransporte),
            },
            informacao_complementar: self.informacao_complementar,
        })
    }

    /// Constrói a NFC-e gerando `agora`/`cNF` internamente; conveniente para
    /// testes e para o caminho feliz sem contingência.
    pub fn build(self) -> Result<Nfe, ErroConstrucao> {
        let agora = Utc::now();
        let codigo_numerico = chave_acesso::gerar_codigo_numerico();
        self.build_em(agora, codigo_numerico)
    }
}

impl ItemBuilder {
    /// Cria um item com a tributação padrão de varejo optante pelo Simples
    /// Nacional (CSOSN 102, PIS/COFINS "outras operações" sem incidência).
    pub fn new(codigo: &str, descricao: &str, ncm: &str, cfop: &str) -> Self {
        Self {
            codigo: codigo.to_string(),
            descricao: descricao.to_string(),
            ncm: ncm.to_string(),
            cfop: cfop.to_string(),
            unidade: "UN".to_string(),
            quantidade: 1.0,
            valor_unitario: 0.0,
            gtin: None,
            valor_desconto: None,
            icms: IcmsRegime::SimplesNacional102 { origem: 0, csosn: "102".to_string() },
            pis: PisRegime::Outras { cst: "49".to_string(), valor_bc: Some(0.0), aliquota: Some(0.0), valor: Some(0.0) },
            cofins: CofinsRegime::Outras { cst: "49".to_string(), valor_bc: Some(0.0), aliquota: Some(0.0), valor: Some(0.0) },
        }
    }

    pub fn unidade(mut self, unidade: &str) -> Self {
        self.unidade = unidade.to_string();
        self
    }

    pub fn quantidade(mut self, qtd: f32) -> Self {
        self.quantidade = qtd;
        self
    }

    pub fn valor_unitario(mut self, valor: f32) -> Self {
        self.valor_unitario = valor;
        self
    }

    pub fn gtin(mut self, gtin: &str) -> Self {
        self.gtin = Some(gtin.to_string());
        self
    }

    pub fn desconto(mut self, valor: f32) -> Self {
        self.valor_desconto = Some(valor);
        self
    }

    /// Seleciona o regime de ICMS do item (CST 00/10/20 ou CSOSN 101/102),
    /// substituindo por completo o default do Simples Nacional de `new`.
    pub fn icms(mut self, regime: IcmsRegime) -> Self {
        self.icms = regime;
        self
    }

    /// Seleciona o regime de PIS do item.
    pub fn pis(mut self, regime: PisRegime) -> Self {
        self.pis = regime;
        self
    }

    /// Seleciona o regime de COFINS do item.
    pub fn cofins(mut self, regime: CofinsRegime) -> Self {
        self.cofins = regime;
        self
    }
}

fn somente_digitos(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn builder_basico() -> NfeBuilder {
        NfeBuilder::new()
            .codigo_uf(35)
            .numero(1)
            .serie(1)
            .natureza_operacao("VENDA DE MERCADORIA")
            .codigo_municipio(3550308)
            .emit_cnpj("12.345.678/0001-90")
            .emit_razao_social("EMPRESA TESTE LTDA")
            .emit_ie("123456789")
            .add_item(
                ItemBuilder::new("PROD001", "Produto Teste", "12345678", "5102")
                    .quantidade(10.0)
                    .valor_unitario(100.0),
            )
    }

    #[test]
    fn constroi_nota_com_totais_recalculados() {
        let agora = Utc.with_ymd_and_hms(2024, 5, 8, 10, 0, 0).unwrap();
        let nfe = builder_basico()
            .build_em(agora, "00000001".to_string())
            .unwrap();

        assert_eq!(nfe.ide.numero, 1);
        assert_eq!(nfe.itens.len(), 1);
        assert_eq!(nfe.totais.valor_produtos, 1000.0);
        assert_eq!(nfe.totais.valor_total, 1000.0);
        assert_eq!(nfe.chave_acesso.len(), 44);
        assert!(crate::chave_acesso::validar_dv(&nfe.chave_acesso));
    }

    #[test]
    fn desconto_reduz_o_valor_total() {
        let agora = Utc.with_ymd_and_hms(2024, 5, 8, 10, 0, 0).unwrap();
        let nfe = builder_basico()
            .add_item(
                ItemBuilder::new("PROD002", "Produto 2", "12345678", "5102")
                    .quantidade(1.0)
                    .valor_unitario(50.0)
                    .desconto(10.0),
            )
            .build_em(agora, "00000002".to_string())
            .unwrap();

        assert_eq!(nfe.totais.valor_produtos, 1050.0);
        assert_eq!(nfe.totais.valor_desconto, 10.0);
        assert_eq!(nfe.totais.valor_total, 1040.0);
    }

    #[test]
    fn sem_itens_retorna_erro() {
        let agora = Utc.with_ymd_and_hms(2024, 5, 8, 10, 0, 0).unwrap();
        let resultado = NfeBuilder::new()
            .codigo_uf(35)
            .numero(1)
            .natureza_operacao("VENDA")
            .codigo_municipio(3550308)
            .emit_cnpj("12345678000190")
            .build_em(agora, "00000003".to_string());

        assert!(matches!(resultado, Err(ErroConstrucao::SemItens)));
    }

    #[test]
    fn uf_desconhecida_e_rejeitada() {
        let agora = Utc.with_ymd_and_hms(2024, 5, 8, 10, 0, 0).unwrap();
        let resultado = builder_basico()
            .codigo_uf(99)
            .build_em(agora, "00000004".to_string());

        assert!(matches!(resultado, Err(ErroConstrucao::UfDesconhecida(_))));
    }

    #[test]
    fn item_com_regime_normal_popula_icms00_e_soma_o_valor_destacado() {
        let agora = Utc.with_ymd_and_hms(2024, 5, 8, 10, 0, 0).unwrap();
        let nfe = builder_basico()
            .add_item(
                ItemBuilder::new("PROD003", "Produto tributado", "12345678", "5102")
                    .quantidade(1.0)
                    .valor_unitario(200.0)
                    .icms(IcmsRegime::Tributada00 {
                        origem: 0,
                        modalidade_bc: 3,
                        valor_bc: 200.0,
                        aliquota: 18.0,
                        valor: 36.0,
                    })
                    .pis(PisRegime::Aliquota { cst: "01".to_string(), valor_bc: 200.0, aliquota: 1.65, valor: 3.3 })
                    .cofins(CofinsRegime::Aliquota { cst: "01".to_string(), valor_bc: 200.0, aliquota: 7.6, valor: 15.2 }),
            )
            .build_em(agora, "00000005".to_string())
            .unwrap();

        let item = nfe.itens.iter().find(|i| i.produto.codigo == "PROD003").unwrap();
        let icms = item.imposto.icms.as_ref().unwrap();
        assert!(icms.icms00.is_some());
        assert!(icms.icms_sn102.is_none());
        assert_eq!(icms.icms00.as_ref().unwrap().cst, "00");
        assert_eq!(nfe.totais.valor_icms, 36.0);
        assert_eq!(nfe.totais.valor_pis, 3.3);
        assert_eq!(nfe.totais.valor_cofins, 15.2);
    }

    #[test]
    fn item_sem_regime_explicito_mantem_default_simples_nacional() {
        let item = ItemBuilder::new("PROD004", "Produto SN", "12345678", "5102");
        assert!(matches!(item.icms, IcmsRegime::SimplesNacional102 { .. }));
        assert!(matches!(item.pis, PisRegime::Outras { .. }));
        assert!(matches!(item.cofins, CofinsRegime::Outras { .. }));
    }
}

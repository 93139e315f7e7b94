//! Dados de emissão da NF-e (campos `dhEmi`, `tpEmis`, `finNFe`, `procEmi`, `verProc`)

use chrono::{DateTime, Utc};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Dados de emissão da nota fiscal.
#[derive(Debug, PartialEq, Clone)]
pub struct Emissao {
    /// Data e hora de emissão (tag `dhEmi`)
    pub horario: DateTime<Utc>,
    /// Tipo de emissão (tag `tpEmis`) - normal ou contingência
    pub tipo: TipoEmissao,
    /// Finalidade da emissão (tag `finNFe`)
    pub finalidade: FinalidadeEmissao,
    /// Processo de emissão (tag `procEmi`)
    pub processo: TipoProcessoEmissao,
    /// Versão do aplicativo emissor (tag `verProc`)
    pub versao_processo: String,
}

/// Tipo de emissão da NF-e (tag `tpEmis`)
///
/// Em condições normais de conectividade com a SEFAZ de origem, a emissão
/// é `Normal`. Quando a SEFAZ de origem está indisponível, a nota é
/// transmitida para o SVC (SEFAZ Virtual de Contingência) da região do
/// emitente - AN para a maioria dos estados, RS para os que usam o SVC-RS.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum TipoEmissao {
    /// 1 = Emissão normal
    Normal = 1,
    /// 6 = Contingência SVC-AN (SEFAZ Virtual de Contingência Ambiente Nacional)
    ContingenciaSvcAn = 6,
    /// 7 = Contingência SVC-RS (SEFAZ Virtual de Contingência Rio Grande do Sul)
    ContingenciaSvcRs = 7,
    /// 9 = Contingência off-line (exclusivo de NFC-e)
    ContingenciaOffline = 9,
}

/// Finalidade de emissão da NF-e (tag `finNFe`)
#[derive(Debug, Eq, PartialEq, Copy, Clone, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum FinalidadeEmissao {
    /// 1 = NF-e normal
    Normal = 1,
    /// 2 = NF-e complementar
    Complementar = 2,
    /// 3 = NF-e de ajuste
    Ajuste = 3,
    /// 4 = Devolução de mercadoria
    Devolucao = 4,
}

/// Processo de emissão da NF-e (tag `procEmi`)
#[derive(Debug, Eq, PartialEq, Copy, Clone, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum TipoProcessoEmissao {
    /// 0 = Emissão de NF-e com aplicativo do contribuinte
    ViaAplicativoDoContribuinte = 0,
    /// 1 = Emissão de NF-e avulsa pelo Fisco
    AvulsaFisco = 1,
    /// 2 = Emissão de NF-e avulsa, pelo contribuinte com seu certificado
    AvulsaContribuinte = 2,
    /// 3 = Emissão NF-e pelo contribuinte com aplicativo fornecido pelo Fisco
    ContribuinteComAplicativoFisco = 3,
}

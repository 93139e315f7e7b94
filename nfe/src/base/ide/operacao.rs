//! Dados da operação fiscal (campos `natOp`, `tpNF`, `idDest`, `indFinal`, `indPres`, `indIntermed`)

use chrono::{DateTime, Utc};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Dados da operação comercial que originou a nota fiscal.
#[derive(Debug, PartialEq, Clone)]
pub struct Operacao {
    /// Data/hora de saída ou entrada da mercadoria (tag `dhSaiEnt`), opcional em NFC-e
    pub horario: Option<DateTime<Utc>>,
    /// Tipo da operação: entrada ou saída (tag `tpNF`)
    pub tipo: TipoOperacao,
    /// Destino da operação: interna, interestadual ou exterior (tag `idDest`)
    pub destino: DestinoOperacao,
    /// Natureza da operação (tag `natOp`), ex: "VENDA DE MERCADORIA"
    pub natureza: String,
    /// Indica se a operação se destina a consumidor final (tag `indFinal`)
    pub consumidor: TipoConsumidor,
    /// Indicador de presença do comprador (tag `indPres`)
    pub presenca: TipoPresencaComprador,
    /// Indicador de intermediador/marketplace (tag `indIntermed`), opcional
    pub intermediador: Option<TipoIntermediador>,
}

/// Tipo de operação (tag `tpNF`)
#[derive(Debug, Eq, PartialEq, Copy, Clone, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum TipoOperacao {
    /// 0 = Entrada
    Entrada = 0,
    /// 1 = Saída
    Saida = 1,
}

/// Destino da operação (tag `idDest`)
#[derive(Debug, Eq, PartialEq, Copy, Clone, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum DestinoOperacao {
    /// 1 = Operação interna (mesmo estado)
    Interna = 1,
    /// 2 = Operação interestadual
    Interestadual = 2,
    /// 3 = Operação com exterior
    Exterior = 3,
}

/// Indicador de consumidor final (tag `indFinal`)
#[derive(Debug, Eq, PartialEq, Copy, Clone, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum TipoConsumidor {
    /// 0 = Normal (não consumidor final)
    Normal = 0,
    /// 1 = Consumidor final
    ConsumidorFinal = 1,
}

/// Indicador de presença do comprador (tag `indPres`)
#[derive(Debug, Eq, PartialEq, Copy, Clone, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum TipoPresencaComprador {
    /// 0 = Não se aplica
    NaoSeAplica = 0,
    /// 1 = Operação presencial
    Presencial = 1,
    /// 2 = Operação não presencial, pela internet
    Internet = 2,
    /// 3 = Operação não presencial, teleatendimento
    Teleatendimento = 3,
    /// 4 = NFC-e em operação com entrega a domicílio
    EntregaDomicilio = 4,
    /// 5 = Operação presencial, fora do estabelecimento
    PresencialForaDoEstabelecimento = 5,
    /// 9 = Operação não presencial, outros
    NaoPresencialOutros = 9,
}

/// Indicador de intermediador/plataforma de marketplace (tag `indIntermed`)
#[derive(Debug, Eq, PartialEq, Copy, Clone, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum TipoIntermediador {
    /// 0 = Sem intermediador (venda direta)
    SemIntermediador = 0,
    /// 1 = Site ou plataforma própria do remetente
    PlataformaPropria = 1,
    /// 2 = Site ou plataforma de terceiros (marketplace)
    PlataformaDeTerceiros = 2,
}

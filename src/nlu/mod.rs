//! # NLU — Tipos e Componentes de Linguagem Natural
//!
//! Este módulo reúne os componentes do pipeline e os tipos que circulam
//! entre eles. Cada sub-módulo é uma etapa independente e pura:
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`normalizer`] | Canonicaliza texto persa (espaços + unificação de script) |
//! | [`extractor`] | Extrai entidades (instalação, data, prioridade) por léxico/regex |
//! | [`tokenizer`] | Vocabulário fechado e codificação em sequências de ids |
//! | [`model`] | Encoder BiGRU + atenção + cabeças de classificação (candle) |
//! | [`responder`] | Síntese determinística de resposta por templates |
//!
//! ## Rótulos
//!
//! A ordem dos rótulos define os índices de saída das cabeças do modelo
//! e a ordem dos vetores de probabilidade — é parte do contrato do
//! artefato treinado e não pode mudar entre treino e inferência.

/// Sub-módulo do extrator de entidades por léxico e regex.
pub mod extractor;

/// Sub-módulo da rede neural (encoder + atenção + cabeças).
pub mod model;

/// Sub-módulo do normalizador de texto persa.
pub mod normalizer;

/// Sub-módulo do sintetizador de respostas por templates.
pub mod responder;

/// Sub-módulo do tokenizador de vocabulário fechado.
pub mod tokenizer;

use serde::{Deserialize, Serialize};

/// Intenção classificada da mensagem do usuário.
///
/// As quatro primeiras variantes são as classes do modelo, na ordem dos
/// índices da cabeça de intenção. [`Greeting`](Intent::Greeting) é um
/// **pseudo-rótulo** usado apenas pelo atalho de saudação do orquestrador —
/// o classificador nunca o produz.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Relato de falha ou problema ("o elevador quebrou").
    SupportIssue,
    /// Reserva de uma instalação ("reserve a piscina para amanhã").
    FacilityReservation,
    /// Consulta sobre o andamento de uma solicitação aberta.
    OperationStatus,
    /// Pergunta sobre taxa condominial, dívida ou pagamento.
    FinancialInquiry,
    /// Saudação detectada por palavra-chave (atalho, sem passar pelo modelo).
    Greeting,
}

impl Intent {
    /// Número de classes produzidas pela cabeça de intenção.
    pub const COUNT: usize = 4;

    /// Converte o índice de argmax da cabeça de intenção no rótulo.
    ///
    /// Retorna `None` para índices fora do intervalo — `Greeting` não tem
    /// índice, pois nunca sai do classificador.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Intent::SupportIssue),
            1 => Some(Intent::FacilityReservation),
            2 => Some(Intent::OperationStatus),
            3 => Some(Intent::FinancialInquiry),
            _ => None,
        }
    }

    /// Rótulo textual, idêntico ao usado no dataset de treino.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::SupportIssue => "support_issue",
            Intent::FacilityReservation => "facility_reservation",
            Intent::OperationStatus => "operation_status",
            Intent::FinancialInquiry => "financial_inquiry",
            Intent::Greeting => "greeting",
        }
    }
}

/// Tom emocional classificado da mensagem.
///
/// A ordem das variantes segue os índices da cabeça de sentimento.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    /// Usuário insatisfeito/chateado — respostas usam enquadramento empático.
    Negative,
    /// Usuário satisfeito.
    Positive,
    /// Tom neutro (default do atalho de saudação).
    Neutral,
}

impl Sentiment {
    /// Número de classes produzidas pela cabeça de sentimento.
    pub const COUNT: usize = 3;

    /// Converte o índice de argmax da cabeça de sentimento no rótulo.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Sentiment::Negative),
            1 => Some(Sentiment::Positive),
            2 => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    /// Rótulo textual, idêntico ao usado no dataset de treino.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// Entidades estruturadas extraídas do texto normalizado.
///
/// Cada campo é `Option` para distinguir "não detectado" de "detectado" em
/// tempo de compilação. Invariante: um campo presente tem **pelo menos um**
/// item — o extrator nunca produz `Some(vec![])`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    /// Instalações mencionadas (ex.: "آسانسور"), na ordem do léxico, sem duplicatas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<Vec<String>>,
    /// Expressão de data detectada — no máximo uma (primeiro padrão que casar).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Vec<String>>,
    /// Nível de prioridade detectado — sempre um único item por construção.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Vec<String>>,
}

impl Entities {
    /// `true` se nenhuma entidade foi detectada.
    pub fn is_empty(&self) -> bool {
        self.facility.is_none() && self.date.is_none() && self.priority.is_none()
    }
}

/// Resultado completo de uma chamada a [`Chatbot::predict`](crate::Chatbot::predict).
///
/// É o registro devolvido ao chamador externo (a camada HTTP do backend
/// serializa este struct como JSON, fora do escopo desta biblioteca).
#[derive(Clone, Debug, Serialize)]
pub struct Prediction {
    /// Intenção prevista (ou [`Intent::Greeting`] no atalho de saudação).
    pub intent: Intent,
    /// Sentimento previsto.
    pub sentiment: Sentiment,
    /// Distribuição de probabilidade das 4 intenções (soma 1).
    pub intent_prob: Vec<f32>,
    /// Distribuição de probabilidade dos 3 sentimentos (soma 1).
    pub sentiment_prob: Vec<f32>,
    /// Entidades extraídas do texto normalizado.
    pub entities: Entities,
    /// Resposta sintetizada, pronta para exibição.
    pub response_text: String,
}

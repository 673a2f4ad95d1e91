//! # Erros — Taxonomia do Pipeline
//!
//! O pipeline tem exatamente dois modos de falha de contrato:
//!
//! | Erro | Quando | Recuperação |
//! |------|--------|-------------|
//! | [`ChatbotError::ModelArtifactMissing`] | `load()` não encontra o bundle | provisionar o artefato e chamar `load()` de novo |
//! | [`ChatbotError::NotLoaded`] | `predict()` antes de um `load()` bem-sucedido | erro do chamador, sem retry interno |
//!
//! Todo o resto (tokens desconhecidos, nenhuma entidade, baixa confiança)
//! degrada para ramos de fallback definidos em vez de levantar erro.
//! As variantes de manifesto cobrem artefatos presentes porém corrompidos
//! ou de formato incompatível.
//!
//! As funções públicas retornam `anyhow::Result`; as variantes tipadas
//! podem ser recuperadas via `err.downcast_ref::<ChatbotError>()`.

use std::path::PathBuf;

use thiserror::Error;

/// Erros tipados do pipeline de inferência.
#[derive(Debug, Error)]
pub enum ChatbotError {
    /// O diretório do artefato não existe ou está incompleto.
    #[error("artefato do modelo não encontrado em '{0}' — treine e salve o bundle antes de carregar")]
    ModelArtifactMissing(PathBuf),

    /// `predict()` foi chamado com o orquestrador ainda em estado Unloaded.
    #[error("modelo não carregado — chame load() antes de predict()")]
    NotLoaded,

    /// O manifesto existe mas não pôde ser desserializado.
    #[error("manifesto do artefato inválido: {0}")]
    InvalidManifest(String),

    /// O manifesto declara um formato que esta versão não lê.
    #[error("versão de artefato incompatível: esperado '{expected}', encontrado '{found}'")]
    WrongArtifactVersion {
        /// Versão de formato suportada por este binário.
        expected: &'static str,
        /// Versão declarada no manifesto carregado.
        found: String,
    },
}

//! # Configuração — Hiperparâmetros do Modelo
//!
//! Constantes centrais do pipeline. Os valores são os mesmos usados no
//! treinamento offline — o artefato persistido carrega `MAX_LEN` junto
//! com o vocabulário, mas as dimensões da rede são fixas por versão de
//! formato (ver [`crate::artifact`]).

/// Número máximo de tokens em uma sequência de entrada.
///
/// Textos mais longos são truncados; mais curtos recebem padding (id 0)
/// à direita até este comprimento. O valor é persistido no manifesto do
/// artefato e prevalece sobre esta constante no carregamento.
pub const MAX_LEN: usize = 24;

/// Dimensionalidade dos embeddings de palavra.
pub const EMBED_DIM: usize = 128;

/// Dimensionalidade do estado oculto de cada direção da GRU.
///
/// Como o encoder é bidirecional, o vetor por posição tem `2 * HIDDEN_DIM`.
pub const HIDDEN_DIM: usize = 192;

/// Número de camadas bidirecionais empilhadas no encoder.
pub const NUM_LAYERS: usize = 2;

/// Taxa de dropout das cabeças de classificação (desligado na inferência).
pub const DROPOUT: f32 = 0.25;

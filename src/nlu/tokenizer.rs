//! # Tokenizador — Vocabulário Fechado em Nível de Palavra
//!
//! O [`Tokenizer`] mapeia texto normalizado para sequências de ids inteiros
//! de comprimento fixo, consumidas pelo encoder. O vocabulário é construído
//! **uma vez** no treinamento ([`fit`](Tokenizer::fit)) e congelado; a
//! inferência ([`encode`](Tokenizer::encode)) só lê.
//!
//! ## Ids Reservados
//!
//! | Token | Id | Uso |
//! |-------|----|----|
//! | `<pad>` | 0 | Preenchimento à direita até `max_len` |
//! | `<unk>` | 1 | Qualquer token fora do vocabulário |
//!
//! ## Invariante de Comprimento
//!
//! `encode(texto, max_len).len() == max_len` para **qualquer** texto e
//! qualquer `max_len` — texto vazio vira só padding, texto longo é truncado.
//!
//! O vocabulário é serializável ([`serde`]) e viaja dentro do manifesto do
//! artefato; seu tamanho no carregamento determina o número de linhas da
//! tabela de embeddings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::normalizer::normalize_fa;

/// Id reservado do token de padding.
pub const PAD_ID: u32 = 0;

/// Id reservado de token desconhecido.
pub const UNK_ID: u32 = 1;

/// Tokenizador de vocabulário fechado, em nível de palavra.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tokenizer {
    /// Mapa token → id. Ids 0 e 1 são reservados (`<pad>`, `<unk>`).
    word2idx: HashMap<String, u32>,
}

impl Tokenizer {
    /// Cria um tokenizador vazio, só com os dois ids reservados.
    pub fn new() -> Self {
        let mut word2idx = HashMap::new();
        word2idx.insert("<pad>".to_string(), PAD_ID);
        word2idx.insert("<unk>".to_string(), UNK_ID);
        Self { word2idx }
    }

    /// Constrói o vocabulário a partir de um corpus.
    ///
    /// Cada texto é normalizado e separado por whitespace; tokens inéditos
    /// recebem o próximo id na **ordem de encontro**. Tokens repetidos são
    /// ignorados — chamadas repetidas com o mesmo corpus não mudam nada.
    ///
    /// Roda uma única vez, offline, antes do treinamento.
    pub fn fit<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for text in texts {
            let normalized = normalize_fa(text.as_ref());
            for word in normalized.split_whitespace() {
                if !self.word2idx.contains_key(word) {
                    let idx = self.word2idx.len() as u32;
                    self.word2idx.insert(word.to_string(), idx);
                }
            }
        }
    }

    /// Codifica um texto em exatamente `max_len` ids.
    ///
    /// Normaliza, separa por whitespace, mapeia cada token pelo vocabulário
    /// (desconhecido → [`UNK_ID`]), trunca em `max_len` e preenche à
    /// direita com [`PAD_ID`].
    pub fn encode(&self, text: &str, max_len: usize) -> Vec<u32> {
        let normalized = normalize_fa(text);
        let mut ids: Vec<u32> = normalized
            .split_whitespace()
            .map(|w| self.word2idx.get(w).copied().unwrap_or(UNK_ID))
            .collect();
        ids.truncate(max_len);
        ids.resize(max_len, PAD_ID);
        ids
    }

    /// Número total de entradas do vocabulário (incluindo as reservadas).
    ///
    /// Define o número de linhas da tabela de embeddings do modelo.
    pub fn vocab_size(&self) -> usize {
        self.word2idx.len()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

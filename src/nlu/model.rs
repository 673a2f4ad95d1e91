//! # Modelo Neural — Encoder BiGRU com Atenção e Duas Cabeças
//!
//! Rede de classificação conjunta de intenção e sentimento, implementada
//! com `candle`:
//!
//! ```text
//! ids [B, T]
//!   ├── Embedding (vocab × 128)              → [B, T, 128]
//!   ├── BiGRU camada 0 (128 → 2×192)         → [B, T, 384]
//!   ├── BiGRU camada 1 (384 → 2×192)         → [B, T, 384]
//!   ├── Atenção aditiva (Linear 384→1 + softmax sobre T)
//!   │     contexto = Σ pesos·saídas          → [B, 384]
//!   ├── Cabeça intenção: 384→256→ReLU→Dropout→4
//!   └── Cabeça sentimento: 384→128→ReLU→Dropout→3
//! ```
//!
//! ## Bidirecionalidade
//!
//! O candle não tem GRU bidirecional pronta — cada camada roda duas GRUs
//! independentes, uma sobre a sequência original e outra sobre a sequência
//! invertida (via `index_select`), e concatena os estados por posição.
//!
//! ## Determinismo
//!
//! A inferência é determinística para pesos fixos: dropout desligado
//! (`train = false`) e execução em CPU. O id de padding (0) tem uma linha
//! de embedding como qualquer outra; o treinamento a mantém com
//! contribuição desprezível e a atenção aprende a ignorá-la.

use anyhow::{ensure, Result};
use candle_core::{Device, Module, Tensor, D};
use candle_nn::ops::{self, Dropout};
use candle_nn::rnn::{gru, GRU, GRUConfig, RNN};
use candle_nn::{embedding, linear, Embedding, Linear, VarBuilder};

use crate::config::{DROPOUT, EMBED_DIM, HIDDEN_DIM};
use crate::nlu::{Intent, Sentiment};

/// Atenção aditiva simples: projeção escalar por posição + softmax.
#[derive(Debug)]
struct Attention {
    /// Projeção linear `[B, T, D] → [B, T, 1]` dos scores de atenção.
    proj: Linear,
}

impl Attention {
    fn new(dim: usize, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            proj: linear(dim, 1, vb.pp("proj"))?,
        })
    }

    /// Retorna `(contexto [B, D], pesos [B, T])`; os pesos somam 1 por linha.
    fn forward(&self, xs: &Tensor) -> Result<(Tensor, Tensor)> {
        let scores = self.proj.forward(xs)?.squeeze(D::Minus1)?; // [B, T]
        let weights = ops::softmax(&scores, D::Minus1)?; // [B, T]
        // Soma ponderada das saídas por posição
        let context = xs.broadcast_mul(&weights.unsqueeze(D::Minus1)?)?.sum(1)?; // [B, D]
        Ok((context, weights))
    }
}

/// Uma camada GRU bidirecional: duas GRUs independentes concatenadas.
#[derive(Debug)]
struct BiGru {
    fwd: GRU,
    bwd: GRU,
}

impl BiGru {
    fn new(in_dim: usize, hidden_dim: usize, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            fwd: gru(in_dim, hidden_dim, GRUConfig::default(), vb.pp("fwd"))?,
            bwd: gru(in_dim, hidden_dim, GRUConfig::default(), vb.pp("bwd"))?,
        })
    }

    /// `[B, T, in_dim] → [B, T, 2·hidden_dim]` (direções concatenadas).
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let (_b, t, _f) = xs.dims3()?;
        let rev: Vec<u32> = (0..t as u32).rev().collect();
        let rev_idx = Tensor::from_vec(rev, t, xs.device())?;

        let fwd_states = self.fwd.seq(xs)?;
        let fwd_hs: Vec<Tensor> = fwd_states.iter().map(|s| s.h().clone()).collect();
        let fwd_out = Tensor::stack(&fwd_hs, 1)?; // [B, T, H]

        // Direção reversa: inverte a sequência, roda, e realinha a saída
        let xs_rev = xs.index_select(&rev_idx, 1)?;
        let bwd_states = self.bwd.seq(&xs_rev)?;
        let bwd_hs: Vec<Tensor> = bwd_states.iter().map(|s| s.h().clone()).collect();
        let bwd_out = Tensor::stack(&bwd_hs, 1)?.index_select(&rev_idx, 1)?; // [B, T, H]

        Ok(Tensor::cat(&[&fwd_out, &bwd_out], D::Minus1)?)
    }
}

/// Saída bruta de uma inferência sobre uma sequência única.
#[derive(Clone, Debug)]
pub struct ModelOutput {
    /// Logits da cabeça de intenção, na ordem dos índices de [`Intent`].
    pub intent_logits: Vec<f32>,
    /// Logits da cabeça de sentimento, na ordem dos índices de [`Sentiment`].
    pub sentiment_logits: Vec<f32>,
    /// Pesos de atenção por posição da sequência (somam 1).
    pub attention_weights: Vec<f32>,
}

/// Modelo principal: encoder compartilhado + cabeças independentes.
#[derive(Debug)]
pub struct ChatbotModel {
    embedding: Embedding,
    layer0: BiGru,
    layer1: BiGru,
    attn: Attention,
    intent_fc1: Linear,
    intent_fc2: Linear,
    sentiment_fc1: Linear,
    sentiment_fc2: Linear,
    dropout: Dropout,
}

impl ChatbotModel {
    /// Constrói o modelo para um dado tamanho de vocabulário.
    ///
    /// Com um `VarBuilder` sobre `VarMap`, os pesos são inicializados
    /// aleatoriamente (lado do treino/testes); sobre safetensors, são
    /// restaurados do artefato — os nomes de variáveis são o contrato
    /// entre os dois lados.
    pub fn new(vocab_size: usize, vb: VarBuilder) -> Result<Self> {
        let out_dim = 2 * HIDDEN_DIM;
        Ok(Self {
            embedding: embedding(vocab_size, EMBED_DIM, vb.pp("embedding"))?,
            layer0: BiGru::new(EMBED_DIM, HIDDEN_DIM, vb.pp("encoder.l0"))?,
            layer1: BiGru::new(out_dim, HIDDEN_DIM, vb.pp("encoder.l1"))?,
            attn: Attention::new(out_dim, vb.pp("attn"))?,
            intent_fc1: linear(out_dim, 256, vb.pp("intent_head.fc1"))?,
            intent_fc2: linear(256, Intent::COUNT, vb.pp("intent_head.fc2"))?,
            sentiment_fc1: linear(out_dim, 128, vb.pp("sentiment_head.fc1"))?,
            sentiment_fc2: linear(128, Sentiment::COUNT, vb.pp("sentiment_head.fc2"))?,
            dropout: Dropout::new(DROPOUT),
        })
    }

    /// Forward pass em tensores.
    ///
    /// `ids`: `[B, T]` (u32). Retorna `(logits_intenção [B, 4],
    /// logits_sentimento [B, 3], pesos_atenção [B, T])`. Com
    /// `train = false` o dropout é identidade.
    pub fn forward(&self, ids: &Tensor, train: bool) -> Result<(Tensor, Tensor, Tensor)> {
        let emb = self.embedding.forward(ids)?; // [B, T, E]
        let out = self.layer0.forward(&emb)?; // [B, T, 2H]
        let out = self.layer1.forward(&out)?; // [B, T, 2H]
        let (ctx, weights) = self.attn.forward(&out)?; // [B, 2H], [B, T]

        let intent_hidden = self
            .dropout
            .forward(&self.intent_fc1.forward(&ctx)?.relu()?, train)?;
        let intent_logits = self.intent_fc2.forward(&intent_hidden)?;

        let sentiment_hidden = self
            .dropout
            .forward(&self.sentiment_fc1.forward(&ctx)?.relu()?, train)?;
        let sentiment_logits = self.sentiment_fc2.forward(&sentiment_hidden)?;

        Ok((intent_logits, sentiment_logits, weights))
    }

    /// Inferência sobre uma única sequência codificada (dropout desligado).
    pub fn infer(&self, sequence: &[u32], device: &Device) -> Result<ModelOutput> {
        ensure!(!sequence.is_empty(), "sequência de entrada vazia");
        let ids = Tensor::from_vec(sequence.to_vec(), (1, sequence.len()), device)?;
        let (intent_logits, sentiment_logits, weights) = self.forward(&ids, false)?;
        Ok(ModelOutput {
            intent_logits: intent_logits.squeeze(0)?.to_vec1()?,
            sentiment_logits: sentiment_logits.squeeze(0)?.to_vec1()?,
            attention_weights: weights.squeeze(0)?.to_vec1()?,
        })
    }
}

/// Softmax numericamente estável sobre um slice de logits.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Índice do maior valor; empates resolvidos pelo **menor** índice.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use candle_core::DType;
    use candle_nn::{VarBuilder, VarMap};

    use super::*;

    fn test_model(vocab_size: usize) -> (ChatbotModel, Device) {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = ChatbotModel::new(vocab_size, vb).unwrap();
        (model, device)
    }

    #[test]
    fn output_dimensions_match_label_counts() {
        let (model, device) = test_model(12);
        let seq = vec![2u32, 3, 4, 0, 0, 0, 0, 0];
        let out = model.infer(&seq, &device).unwrap();
        assert_eq!(out.intent_logits.len(), Intent::COUNT);
        assert_eq!(out.sentiment_logits.len(), Sentiment::COUNT);
        assert_eq!(out.attention_weights.len(), seq.len());
    }

    #[test]
    fn attention_weights_sum_to_one() {
        let (model, device) = test_model(12);
        let out = model.infer(&[2, 3, 4, 0, 0, 0], &device).unwrap();
        let sum: f32 = out.attention_weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4, "soma = {sum}");
        assert!(out.attention_weights.iter().all(|&w| w >= 0.0));
    }

    #[test]
    fn inference_is_deterministic() {
        let (model, device) = test_model(12);
        let seq = [2u32, 3, 4, 1, 0, 0, 0, 0];
        let a = model.infer(&seq, &device).unwrap();
        let b = model.infer(&seq, &device).unwrap();
        assert_eq!(a.intent_logits, b.intent_logits);
        assert_eq!(a.sentiment_logits, b.sentiment_logits);
        assert_eq!(a.attention_weights, b.attention_weights);
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let (model, device) = test_model(12);
        assert!(model.infer(&[], &device).is_err());
    }

    #[test]
    fn softmax_is_a_valid_distribution() {
        let probs = softmax(&[1.0, 2.0, 3.0, -1.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|&p| p > 0.0));
        // Maior logit → maior probabilidade
        assert_eq!(argmax(&probs), 2);
    }

    #[test]
    fn softmax_handles_large_logits_without_overflow() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert!((probs[0] - 0.5).abs() < 1e-5);
        assert!(probs.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn argmax_ties_break_to_lowest_index() {
        assert_eq!(argmax(&[0.5, 0.5, 0.1]), 0);
        assert_eq!(argmax(&[0.1, 0.7, 0.7]), 1);
    }
}

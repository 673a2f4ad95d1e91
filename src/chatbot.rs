//! # Chatbot — Orquestrador de Inferência
//!
//! O [`Chatbot`] liga todos os componentes em uma única chamada
//! `predict(texto) → Prediction`. É um **objeto de contexto explícito**
//! (injetado pelo chamador), não um singleton global — cada teste, e em
//! tese cada modelo carregado, tem a sua instância.
//!
//! ## Máquina de Estados
//!
//! ```text
//! Unloaded ──load() ok──▶ Ready
//!    ▲  │                  │
//!    │  └─load() falhou────┘ (permanece Unloaded)
//!    │
//!    predict() em Unloaded → ChatbotError::NotLoaded
//! ```
//!
//! ## Atalho de Saudação
//!
//! Saudações curtas eram sistematicamente mal classificadas pelo modelo,
//! então o orquestrador as intercepta **antes** do encoder: qualquer texto
//! com palavra de saudação retorna o pseudo-rótulo `greeting`, sentimento
//! neutro, vetores de probabilidade degenerados e nenhuma entidade —
//! mesmo que o resto do texto mencione uma instalação.
//!
//! ## Concorrência
//!
//! Após `load()`, modelo, vocabulário e extrator são somente-leitura;
//! chamadas concorrentes a `predict()` são seguras (CPU/candle reentrante).

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::Device;

use crate::artifact;
use crate::error::ChatbotError;
use crate::nlu::extractor::{EntityExtractor, ExtractionMode};
use crate::nlu::model::{argmax, softmax, ChatbotModel};
use crate::nlu::normalizer::normalize_fa;
use crate::nlu::responder::{generate_response, is_greeting};
use crate::nlu::tokenizer::Tokenizer;
use crate::nlu::{Entities, Intent, Prediction, Sentiment};

/// Estado Ready: as três peças do artefato, congeladas após o `load()`.
struct Ready {
    model: ChatbotModel,
    tokenizer: Tokenizer,
    max_len: usize,
}

/// Orquestrador de inferência do chatbot.
pub struct Chatbot {
    /// `None` = Unloaded; `Some` = Ready.
    state: Option<Ready>,
    /// Extrator de entidades — independente do artefato.
    extractor: EntityExtractor,
    /// Device de execução (CPU).
    device: Device,
}

impl Chatbot {
    /// Cria um orquestrador em estado Unloaded, com extração em modo união.
    pub fn new() -> Self {
        Self::with_extraction_mode(ExtractionMode::Union)
    }

    /// Cria um orquestrador com o modo de extração de entidades explícito.
    pub fn with_extraction_mode(mode: ExtractionMode) -> Self {
        Self {
            state: None,
            extractor: EntityExtractor::with_mode(mode),
            device: Device::Cpu,
        }
    }

    /// `true` se um artefato já foi carregado com sucesso.
    pub fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    /// Carrega o artefato persistido e transiciona Unloaded → Ready.
    ///
    /// Em caso de falha (artefato ausente, manifesto inválido, versão
    /// incompatível) o orquestrador **permanece Unloaded** — o chamador
    /// pode provisionar o artefato e tentar de novo.
    pub fn load<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let loaded = artifact::load(dir.as_ref(), &self.device)
            .with_context(|| format!("Falha ao carregar o modelo de {:?}", dir.as_ref()))?;
        self.state = Some(Ready {
            model: loaded.model,
            tokenizer: loaded.tokenizer,
            max_len: loaded.max_len,
        });
        tracing::info!("Chatbot pronto para inferência");
        Ok(())
    }

    /// Roda o pipeline completo sobre uma mensagem do usuário.
    ///
    /// Requer estado Ready ([`ChatbotError::NotLoaded`] caso contrário).
    /// Entrada vazia não é erro: atravessa o pipeline e produz o ramo de
    /// fallback do respondedor.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        let ready = self.state.as_ref().ok_or(ChatbotError::NotLoaded)?;

        let text = normalize_fa(text);

        // ─── Atalho de saudação (não roda o encoder) ─────────────
        if is_greeting(&text) {
            tracing::debug!("Atalho de saudação acionado");
            return Ok(Prediction {
                intent: Intent::Greeting,
                sentiment: Sentiment::Neutral,
                intent_prob: vec![1.0, 0.0, 0.0, 0.0],
                sentiment_prob: vec![0.0, 0.0, 1.0],
                entities: Entities::default(),
                response_text: generate_response(
                    Intent::Greeting,
                    Sentiment::Neutral,
                    &Entities::default(),
                    &text,
                ),
            });
        }

        // ─── Encoder + cabeças ───────────────────────────────────
        let sequence = ready.tokenizer.encode(&text, ready.max_len);
        let output = ready.model.infer(&sequence, &self.device)?;

        let intent_prob = softmax(&output.intent_logits);
        let sentiment_prob = softmax(&output.sentiment_logits);
        let intent = Intent::from_index(argmax(&intent_prob))
            .context("índice de intenção fora do intervalo")?;
        let sentiment = Sentiment::from_index(argmax(&sentiment_prob))
            .context("índice de sentimento fora do intervalo")?;

        // ─── Entidades + resposta ────────────────────────────────
        let entities = self.extractor.extract(&text);
        let response_text = generate_response(intent, sentiment, &entities, &text);

        tracing::debug!(
            intent = intent.as_str(),
            sentiment = sentiment.as_str(),
            entities = ?entities,
            "Predição concluída"
        );

        Ok(Prediction {
            intent,
            sentiment,
            intent_prob,
            sentiment_prob,
            entities,
            response_text,
        })
    }
}

impl Default for Chatbot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use candle_core::{DType, Tensor};
    use candle_nn::{loss, AdamW, Optimizer, ParamsAdamW, VarBuilder, VarMap};
    use tracing_subscriber::EnvFilter;

    use super::*;

    /// Habilita o tracing nos testes (nível via `RUST_LOG`), com a saída
    /// capturada por teste pelo harness.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    }

    /// Corpus mínimo para os testes — o suficiente para o vocabulário
    /// cobrir os cenários dos casos de teste.
    const CORPUS: &[&str] = &[
        "آسانسور خراب شده و خیلی ناراحتم",
        "استخر را برای فردا رزرو کن",
        "شارژ این ماه چقدر شد",
        "وضعیت درخواست من چیست",
    ];

    /// Monta um bundle com pesos aleatórios e retorna um Chatbot Ready.
    fn ready_chatbot(dir: &Path) -> Chatbot {
        init_tracing();
        let device = Device::Cpu;
        let mut tokenizer = Tokenizer::new();
        tokenizer.fit(CORPUS.iter().copied());

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let _model = ChatbotModel::new(tokenizer.vocab_size(), vb).unwrap();
        artifact::save(dir, &tokenizer, &varmap, crate::config::MAX_LEN).unwrap();

        let mut bot = Chatbot::new();
        bot.load(dir).unwrap();
        bot
    }

    #[test]
    fn predict_before_load_is_not_loaded_error() {
        let bot = Chatbot::new();
        let err = bot.predict("سلام").unwrap_err();
        assert!(matches!(
            err.root_cause().downcast_ref::<ChatbotError>(),
            Some(ChatbotError::NotLoaded)
        ));
    }

    #[test]
    fn failed_load_leaves_chatbot_unloaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut bot = Chatbot::new();
        assert!(bot.load(dir.path().join("nao_existe")).is_err());
        assert!(!bot.is_ready());
    }

    #[test]
    fn greeting_bypass_skips_the_model() {
        let dir = tempfile::tempdir().unwrap();
        let bot = ready_chatbot(dir.path());

        // Mesmo mencionando o elevador, a saudação vence
        let p = bot.predict("سلام آسانسور خراب است").unwrap();
        assert_eq!(p.intent, Intent::Greeting);
        assert_eq!(p.sentiment, Sentiment::Neutral);
        assert!(p.entities.is_empty());
        assert_eq!(p.intent_prob, vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(p.sentiment_prob, vec![0.0, 0.0, 1.0]);
        assert!(p.response_text.contains("سلام"));
    }

    #[test]
    fn predict_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let bot = ready_chatbot(dir.path());

        let a = bot.predict("آسانسور خراب شده و خیلی ناراحتم").unwrap();
        let b = bot.predict("آسانسور خراب شده و خیلی ناراحتم").unwrap();
        assert_eq!(a.intent, b.intent);
        assert_eq!(a.sentiment, b.sentiment);
        assert_eq!(a.intent_prob, b.intent_prob);
        assert_eq!(a.sentiment_prob, b.sentiment_prob);
        assert_eq!(a.response_text, b.response_text);
    }

    #[test]
    fn probabilities_are_valid_distributions() {
        let dir = tempfile::tempdir().unwrap();
        let bot = ready_chatbot(dir.path());

        let p = bot.predict("وضعیت درخواست من چیست").unwrap();
        let intent_sum: f32 = p.intent_prob.iter().sum();
        let sentiment_sum: f32 = p.sentiment_prob.iter().sum();
        assert_eq!(p.intent_prob.len(), 4);
        assert_eq!(p.sentiment_prob.len(), 3);
        assert!((intent_sum - 1.0).abs() < 1e-4);
        assert!((sentiment_sum - 1.0).abs() < 1e-4);
        assert!(p.intent_prob.iter().all(|&x| x >= 0.0));
        assert!(p.sentiment_prob.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn empty_input_degrades_to_a_nonempty_response() {
        let dir = tempfile::tempdir().unwrap();
        let bot = ready_chatbot(dir.path());

        let p = bot.predict("").unwrap();
        assert!(p.entities.is_empty());
        assert!(!p.response_text.is_empty());
    }

    #[test]
    fn support_issue_scenario_extracts_the_elevator() {
        let dir = tempfile::tempdir().unwrap();
        let bot = ready_chatbot(dir.path());

        // Com pesos aleatórios o rótulo não é verificável, mas as
        // entidades e a resposta são determinísticas
        let p = bot.predict("آسانسور خراب شده و خیلی ناراحتم").unwrap();
        assert_eq!(p.entities.facility, Some(vec!["آسانسور".to_string()]));
        assert_eq!(p.entities.date, None);
        assert!(!p.response_text.is_empty());
    }

    #[test]
    fn reservation_scenario_extracts_facility_and_date() {
        let dir = tempfile::tempdir().unwrap();
        let bot = ready_chatbot(dir.path());

        let p = bot.predict("استخر را برای فردا رزرو کن").unwrap();
        assert_eq!(p.entities.facility, Some(vec!["استخر".to_string()]));
        assert_eq!(p.entities.date, Some(vec!["فردا".to_string()]));
    }

    #[test]
    fn overfit_model_recovers_scenario_labels() {
        init_tracing();
        let device = Device::Cpu;
        let mut tokenizer = Tokenizer::new();
        tokenizer.fit(CORPUS.iter().copied());

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = ChatbotModel::new(tokenizer.vocab_size(), vb).unwrap();

        // Rótulos na ordem do CORPUS: suporte / reserva / financeiro / status
        let intent_labels: Vec<u32> = vec![0, 1, 3, 2];
        let sentiment_labels: Vec<u32> = vec![0, 2, 2, 2];

        // As quatro frases têm no máximo 6 tokens — 8 sobra
        let max_len = 8;
        let ids: Vec<u32> = CORPUS
            .iter()
            .flat_map(|t| tokenizer.encode(t, max_len))
            .collect();
        let ids = Tensor::from_vec(ids, (CORPUS.len(), max_len), &device).unwrap();
        let intent_t = Tensor::from_vec(intent_labels, CORPUS.len(), &device).unwrap();
        let sentiment_t = Tensor::from_vec(sentiment_labels, CORPUS.len(), &device).unwrap();

        // Sobre-ajusta nas quatro frases; dropout desligado para convergir
        // de forma estável
        let params = ParamsAdamW {
            lr: 0.01,
            ..Default::default()
        };
        let mut opt = AdamW::new(varmap.all_vars(), params).unwrap();
        for _ in 0..150 {
            let (intent_logits, sentiment_logits, _) = model.forward(&ids, false).unwrap();
            let l = (loss::cross_entropy(&intent_logits, &intent_t).unwrap()
                + loss::cross_entropy(&sentiment_logits, &sentiment_t).unwrap())
            .unwrap();
            opt.backward_step(&l).unwrap();
        }

        // Persiste o modelo treinado e percorre o pipeline completo
        let dir = tempfile::tempdir().unwrap();
        artifact::save(dir.path(), &tokenizer, &varmap, max_len).unwrap();
        let mut bot = Chatbot::new();
        bot.load(dir.path()).unwrap();

        let p = bot.predict("آسانسور خراب شده و خیلی ناراحتم").unwrap();
        assert_eq!(p.intent, Intent::SupportIssue);
        assert_eq!(p.sentiment, Sentiment::Negative);
        assert!(p.response_text.contains("آسانسور"));
        assert!(p.response_text.contains("گزارش خرابی"));

        let p = bot.predict("استخر را برای فردا رزرو کن").unwrap();
        assert_eq!(p.intent, Intent::FacilityReservation);

        let p = bot.predict("شارژ این ماه چقدر شد").unwrap();
        assert_eq!(p.intent, Intent::FinancialInquiry);

        let p = bot.predict("وضعیت درخواست من چیست").unwrap();
        assert_eq!(p.intent, Intent::OperationStatus);
    }

    #[test]
    fn short_circuit_mode_is_injectable() {
        let dir = tempfile::tempdir().unwrap();
        // Prepara o artefato com um bot default, depois carrega outro
        // com o modo de extração de regressão
        ready_chatbot(dir.path());

        let mut bot = Chatbot::with_extraction_mode(ExtractionMode::PriorityShortCircuit);
        bot.load(dir.path()).unwrap();

        let p = bot.predict("آسانسور فوری تعمیر شود").unwrap();
        assert_eq!(p.entities.priority, Some(vec!["urgent".to_string()]));
        assert_eq!(p.entities.facility, None);
    }

    #[test]
    fn prediction_serializes_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let bot = ready_chatbot(dir.path());

        let p = bot.predict("استخر را برای فردا رزرو کن").unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"intent\""));
        assert!(json.contains("\"response_text\""));
    }
}

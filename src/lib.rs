//! # Unital Chatbot — Pipeline NLU do Assistente Condominial
//!
//! Biblioteca de **compreensão de linguagem natural** para o chatbot de
//! gestão condominial: recebe uma mensagem do usuário em **persa**, e produz
//! intenção, sentimento, entidades estruturadas e uma resposta pronta.
//!
//! ## Fluxo de Inferência
//!
//! ```text
//! Texto bruto do usuário
//!   ├── 1. Normalização (normalize_fa)
//!   ├── 2. Atalho de saudação? → resposta fixa (sem rodar o modelo)
//!   ├── 3. Tokenização → sequência de 24 ids
//!   ├── 4. Encoder BiGRU (2 camadas) + atenção aditiva
//!   ├── 5. Duas cabeças: intenção (4 classes) e sentimento (3 classes)
//!   ├── 6. Extração de entidades (regex + léxico)
//!   └── 7. Síntese de resposta (templates determinísticos)
//! ```
//!
//! ## Módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`config`] | Hiperparâmetros e rótulos suportados |
//! | [`error`] | Taxonomia de erros ([`ChatbotError`]) |
//! | [`nlu`] | Normalizador, tokenizador, extrator, modelo e respondedor |
//! | [`artifact`] | Bundle persistido (manifesto + pesos safetensors) |
//! | [`chatbot`] | Orquestrador de inferência ([`Chatbot`]) |
//!
//! ## Exemplo de Uso
//!
//! ```no_run
//! use unital_chatbot::Chatbot;
//!
//! let mut bot = Chatbot::new();
//! bot.load("models/chatbot")?;
//! let prediction = bot.predict("آسانسور خراب شده و خیلی ناراحتم")?;
//! println!("{} / {}", prediction.intent.as_str(), prediction.response_text);
//! # anyhow::Ok(())
//! ```
//!
//! ## Concorrência
//!
//! Após `load()`, todo o estado é **somente leitura** — chamadas concorrentes
//! a `predict()` sobre o mesmo [`Chatbot`] são seguras, desde que o backend
//! numérico (candle em CPU) seja reentrante, o que é o caso.

/// Módulo `artifact` — persistência do bundle (manifesto + pesos).
pub mod artifact;

/// Módulo `chatbot` — orquestrador de inferência.
pub mod chatbot;

/// Módulo `config` — hiperparâmetros e constantes do modelo.
pub mod config;

/// Módulo `error` — taxonomia de erros tipados.
pub mod error;

/// Módulo `nlu` — componentes de processamento de linguagem natural.
pub mod nlu;

pub use crate::chatbot::Chatbot;
pub use crate::error::ChatbotError;
pub use crate::nlu::extractor::{EntityExtractor, ExtractionMode};
pub use crate::nlu::tokenizer::Tokenizer;
pub use crate::nlu::{Entities, Intent, Prediction, Sentiment};

//! # Extrator de Entidades — Léxico e Regex para Persa
//!
//! O [`EntityExtractor`] identifica entidades estruturadas no texto já
//! normalizado (ver [`normalizer`](super::normalizer)):
//!
//! | Entidade | Estratégia | Cardinalidade |
//! |----------|-----------|---------------|
//! | `facility` | Teste de substring contra léxico fixo de instalações | ≥ 1, sem duplicatas |
//! | `date` | Lista ordenada de regexes (hoje/amanhã/depois de amanhã/dias da semana) | exatamente 1 (primeiro match) |
//! | `priority` | Mapa ordenado nível → palavras-chave (urgent > high > medium > low) | exatamente 1 (primeiro nível que casar) |
//!
//! ## Dois Modos de Extração
//!
//! O backend original conviveu com duas implementações de extrator com
//! comportamentos diferentes, e ambas têm consumidores:
//!
//! - [`ExtractionMode::Union`] (**default**) — instalação, data e prioridade
//!   são computadas de forma independente; o resultado é a união.
//! - [`ExtractionMode::PriorityShortCircuit`] — a prioridade é testada
//!   **primeiro** e, ao casar, a extração retorna imediatamente só com a
//!   prioridade, pulando instalação e data. É uma peculiaridade preservada
//!   por compatibilidade de regressão, não um comportamento desejável.
//!
//! ## Exemplo
//!
//! ```rust
//! use unital_chatbot::EntityExtractor;
//!
//! let extractor = EntityExtractor::new();
//! let entities = extractor.extract("استخر را برای فردا رزرو کن");
//! assert_eq!(entities.facility, Some(vec!["استخر".to_string()]));
//! assert_eq!(entities.date, Some(vec!["فردا".to_string()]));
//! ```

use regex::Regex;

use super::Entities;

/// Léxico fixo de instalações do condomínio.
///
/// A ordem define a ordem relativa dos matches no resultado. As formas são
/// as canônicas pós-normalização (yeh/keh persas).
pub const FACILITIES: &[&str] = &[
    "آسانسور",  // elevador
    "آب",       // água
    "برق",      // eletricidade
    "پارکینگ",  // estacionamento
    "درب",      // porta
    "دوربین",   // câmera
    "لابی",     // lobby
    "استخر",    // piscina
    "سالن",     // salão
    "باشگاه",   // academia
    "روف گاردن", // roof garden
    "حیاط",     // pátio
    "تاسیسات",  // utilidades/instalações prediais
    "انباری",   // depósito
    "آیفون",    // interfone
];

/// Padrões de data, testados em ordem — o primeiro que casar vence.
///
/// Apenas o primeiro span casado é mantido, mesmo que o texto contenha
/// várias palavras de data.
const DATE_PATTERNS: &[&str] = &[
    r"\bامروز\b",
    r"\bفردا\b",
    r"\bپس\s?فردا\b",
    r"\bشنبه\b|\bیکشنبه\b|\bدوشنبه\b|\bسه\s?شنبه\b|\bچهارشنبه\b|\bپنجشنبه\b|\bجمعه\b",
];

/// Níveis de prioridade em ordem decrescente, com suas palavras indicativas.
///
/// O primeiro nível cuja palavra aparecer no texto é o resultado; níveis
/// seguintes não são testados.
const PRIORITY_LEVELS: &[(&str, &[&str])] = &[
    ("urgent", &["فوری", "خیلی فوری", "ضروری", "اورژانسی"]),
    ("high", &["مهم", "سریع", "هرچی زودتر"]),
    ("medium", &["عادی", "معمولی"]),
    ("low", &["بعداً", "عجله ندارم"]),
];

/// Comportamento do extrator frente a um match de prioridade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Instalação, data e prioridade computadas independentemente (união).
    #[default]
    Union,
    /// Prioridade testada primeiro; ao casar, retorna só a prioridade.
    PriorityShortCircuit,
}

/// Extrator de entidades com regexes compiladas uma única vez.
pub struct EntityExtractor {
    /// Regexes de data compiladas, na ordem de [`DATE_PATTERNS`].
    date_patterns: Vec<Regex>,
    /// Modo de extração (ver docs do módulo).
    mode: ExtractionMode,
}

impl EntityExtractor {
    /// Cria um extrator no modo default ([`ExtractionMode::Union`]).
    pub fn new() -> Self {
        Self::with_mode(ExtractionMode::Union)
    }

    /// Cria um extrator com o modo de extração explícito.
    pub fn with_mode(mode: ExtractionMode) -> Self {
        Self {
            // Padrões constantes e testados — a compilação não falha
            date_patterns: DATE_PATTERNS
                .iter()
                .map(|p| Regex::new(p).unwrap())
                .collect(),
            mode,
        }
    }

    /// Extrai entidades do texto **já normalizado**.
    ///
    /// Nunca retorna um campo com lista vazia: cada campo vem `None` ou
    /// com pelo menos um item.
    pub fn extract(&self, text: &str) -> Entities {
        let mut entities = Entities::default();

        // ─── Atalho de prioridade (modo short-circuit) ───────────
        // Ao casar, instalação e data NÃO são computadas nesta chamada.
        if self.mode == ExtractionMode::PriorityShortCircuit {
            if let Some(level) = self.match_priority(text) {
                entities.priority = Some(vec![level.to_string()]);
                return entities;
            }
        }

        // ─── Instalações ─────────────────────────────────────────
        // Teste de substring contra o léxico; ordem relativa preservada.
        let mut facilities: Vec<String> = Vec::new();
        for f in FACILITIES {
            if text.contains(f) && !facilities.iter().any(|seen| seen == f) {
                facilities.push((*f).to_string());
            }
        }
        if !facilities.is_empty() {
            entities.facility = Some(facilities);
        }

        // ─── Data ────────────────────────────────────────────────
        // Primeiro padrão que casar vence; só o primeiro span é mantido.
        for re in &self.date_patterns {
            if let Some(m) = re.find(text) {
                entities.date = Some(vec![m.as_str().to_string()]);
                break;
            }
        }

        // ─── Prioridade (modo união) ─────────────────────────────
        if self.mode == ExtractionMode::Union {
            if let Some(level) = self.match_priority(text) {
                entities.priority = Some(vec![level.to_string()]);
            }
        }

        entities
    }

    /// Primeiro nível de prioridade cuja palavra-chave aparece no texto.
    fn match_priority(&self, text: &str) -> Option<&'static str> {
        for (level, words) in PRIORITY_LEVELS {
            for w in *words {
                if text.contains(w) {
                    return Some(level);
                }
            }
        }
        None
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

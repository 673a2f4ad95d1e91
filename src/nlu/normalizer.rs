//! # Normalizador — Canonicalização de Texto Persa
//!
//! Primeiro passo de todo o pipeline: transforma o texto bruto do usuário
//! em uma forma canônica sobre a qual o léxico, as regexes e o vocabulário
//! do tokenizador foram construídos.
//!
//! ## Por que unificar o script?
//!
//! Teclados árabes e persas produzem variantes visuais **idênticas** de
//! algumas letras com code points diferentes. Sem unificação, "آسانسور"
//! digitado com yeh árabe não casaria com o léxico de instalações:
//!
//! | Variante árabe | Forma persa canônica |
//! |----------------|----------------------|
//! | `ي` (U+064A, yeh árabe) | `ی` (U+06CC, yeh persa) |
//! | `ك` (U+0643, kaf árabe) | `ک` (U+06A9, keh persa) |
//!
//! ## Etapas
//!
//! ```text
//! texto bruto
//!   ├── 1. NFC (Unicode) — composição canônica
//!   ├── 2. ي → ی e ك → ک (unificação de script)
//!   └── 3. colapso de whitespace (tabs/quebras → 1 espaço) + trim
//! ```
//!
//! A função é pura e **idempotente**: `normalize_fa(normalize_fa(x)) ==
//! normalize_fa(x)` para qualquer entrada.

use unicode_normalization::UnicodeNormalization;

/// Normaliza texto persa para a forma canônica do pipeline.
///
/// Entrada vazia produz string vazia, sem erro. Qualquer run de whitespace
/// (incluindo `\n` e `\t`) vira um único espaço ASCII; whitespace nas
/// bordas é removido.
pub fn normalize_fa(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    // Composição canônica Unicode antes da substituição de caracteres
    let text: String = text.nfc().collect();
    // Unificação das variantes árabes para as formas persas
    let text = text.replace('ي', "ی").replace('ك', "ک");
    // split_whitespace cobre trim + colapso de múltiplos separadores
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! # Respondedor — Síntese Determinística de Respostas
//!
//! Última etapa do pipeline: transforma `(intenção, sentimento, entidades,
//! texto)` em uma resposta em persa, por tabela de regras. Função pura —
//! sem I/O, sem aleatoriedade.
//!
//! ## Ordem Estrita de Prioridade
//!
//! ```text
//! 1. Texto contém saudação?     → resposta fixa de saudação
//! 2. Texto contém agradecimento? → resposta fixa de reconhecimento
//! 3. Senão, ramo por intenção:
//!    ├── support_issue          → nomeia instalação; tom varia com o sentimento
//!    ├── facility_reservation   → nomeia instalação e data (com fallbacks)
//!    ├── financial_inquiry      → pede a categoria (taxa/dívida/pagamento)
//!    ├── operation_status       → pede o número da solicitação
//!    └── qualquer outro         → pedido genérico de esclarecimento
//! ```
//!
//! As saudações vencem **qualquer** classificação do modelo — é o mesmo
//! critério do atalho no orquestrador, repetido aqui para manter a função
//! autocontida.

use super::normalizer::normalize_fa;
use super::{Entities, Intent, Sentiment};

/// Palavras de saudação (persa + os dois cumprimentos latinos aceitos).
pub const GREETINGS: &[&str] = &[
    "سلام",
    "سلامم",
    "درود",
    "وقت بخیر",
    "صبح بخیر",
    "عصر بخیر",
    "شب بخیر",
    "خسته نباشید",
    "hi",
    "hello",
];

/// Palavras de agradecimento.
pub const THANKS: &[&str] = &["ممنون", "مرسی", "دمت گرم", "سپاس"];

/// Resposta fixa para saudações.
const GREETING_REPLY: &str =
    "سلام 😊 من پشتیبان هوشمند سیستم مجتمع هستم. مشکل یا درخواستت رو بگو تا سریع راهنماییت کنم.";

/// Resposta fixa para agradecimentos.
const THANKS_REPLY: &str = "خواهش می‌کنم 🌿 اگر باز هم کاری داشتی در خدمتم.";

/// Fallback genérico quando nenhuma intenção reconhecida se aplica.
const FALLBACK_REPLY: &str = "متوجه نشدم 😅 لطفاً واضح‌تر بفرمایید مشکل خرابی است یا رزرو یا مالی؟";

/// `true` se o texto contém alguma palavra de saudação.
///
/// Opera sobre texto normalizado e minúsculo (para `hi`/`hello`).
pub fn is_greeting(text: &str) -> bool {
    let t = normalize_fa(text).to_lowercase();
    GREETINGS.iter().any(|g| t.contains(g))
}

/// `true` se o texto contém alguma palavra de agradecimento.
pub fn is_thanks(text: &str) -> bool {
    let t = normalize_fa(text).to_lowercase();
    THANKS.iter().any(|w| t.contains(w))
}

/// Sintetiza a resposta final a partir dos quatro insumos do pipeline.
pub fn generate_response(
    intent: Intent,
    sentiment: Sentiment,
    entities: &Entities,
    text: &str,
) -> String {
    // Saudação e agradecimento vencem a predição do modelo
    if is_greeting(text) {
        return GREETING_REPLY.to_string();
    }
    if is_thanks(text) {
        return THANKS_REPLY.to_string();
    }

    match intent {
        Intent::SupportIssue => {
            let fac = entities
                .facility
                .as_ref()
                .map(|f| f.join(", "))
                .unwrap_or_else(|| "مشکل اعلام‌شده".to_string());
            if sentiment == Sentiment::Negative {
                format!(
                    "متوجه ناراحتی شما هستم 🙏 گزارش خرابی مربوط به **{fac}** ثبت شد و برای تیم اجرایی ارسال می‌شود."
                )
            } else {
                format!("✅ گزارش مربوط به **{fac}** ثبت شد. در اولین فرصت پیگیری می‌شود.")
            }
        }
        Intent::FacilityReservation => {
            let fac = entities
                .facility
                .as_ref()
                .map(|f| f.join(", "))
                .unwrap_or_else(|| "امکانات".to_string());
            let date = entities
                .date
                .as_ref()
                .map(|d| d.join(", "))
                .unwrap_or_else(|| "زمان موردنظر".to_string());
            format!(
                "✅ درخواست رزرو **{fac}** برای **{date}** ثبت شد. اگر زمان دقیق هم بفرمایید کامل‌تر می‌شود."
            )
        }
        Intent::FinancialInquiry => {
            if sentiment == Sentiment::Negative {
                "متوجه نگرانی شما هستم 🙏 لطفاً بفرمایید درباره **شارژ، بدهی یا پرداخت** کدام مورد سوال دارید؟"
                    .to_string()
            } else {
                "برای بررسی وضعیت مالی، لطفاً مشخص کنید: **شارژ این ماه / بدهی / تایید پرداخت**؟"
                    .to_string()
            }
        }
        Intent::OperationStatus => {
            if sentiment == Sentiment::Negative {
                "حق دارید پیگیری کنید 🙏 لطفاً شماره درخواست یا توضیح کوتاه بدهید تا وضعیتش را دقیق بررسی کنم."
                    .to_string()
            } else {
                "لطفاً بفرمایید مربوط به **کدام درخواست/خرابی** است تا وضعیت آن را اعلام کنم."
                    .to_string()
            }
        }
        // O pseudo-rótulo de saudação sem palavra de saudação no texto
        // não tem ramo próprio: cai no esclarecimento genérico.
        Intent::Greeting => FALLBACK_REPLY.to_string(),
    }
}

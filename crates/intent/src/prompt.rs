//! Prompt construction. The system prompt is generated from the plan's
//! intent list so the model never sees intents outside the plan.

use crate::config::TON_INPUT_PLACEHOLDER;
use crate::plan::Plan;
use crate::types::{CampaignType, ProductSummary};

const SYSTEM_PREAMBLE: &str = "Eres un asistente de ventas por WhatsApp. Tu tarea es interpretar mensajes de clientes y responder en formato TON (Tree Object Notation).

Formato de salida TON requerido:
intent:\"tipo_de_intencion\"
product_query:\"nombre_del_producto\" (opcional)
quantity:\"1\" (opcional)
response:\"respuesta_amigable_al_cliente\"
confidence:0.95 (opcional)

Intenciones disponibles según el plan:";

const SYSTEM_CLOSING: &str =
    "IMPORTANTE: Siempre responde SOLO en formato TON válido, sin explicaciones adicionales.";

pub(crate) const MARKETING_SYSTEM_PROMPT: &str = "Eres un experto en marketing por WhatsApp. Genera mensajes cortos, amigables y persuasivos (máximo 300 caracteres).";

/// System prompt for `plan`: the TON output contract followed by one
/// `- label` line per allowed intent.
pub fn system_prompt(plan: Plan) -> String {
    let mut prompt = String::from(SYSTEM_PREAMBLE);
    for intent in plan.intents() {
        prompt.push_str("\n- ");
        prompt.push_str(intent.as_str());
    }
    prompt.push_str("\n\n");
    prompt.push_str(SYSTEM_CLOSING);
    prompt
}

/// Replaces the first `{{TON_INPUT}}` in `template` with `ton_input`.
/// A template without the placeholder is returned unchanged.
pub fn render_user_prompt(template: &str, ton_input: &str) -> String {
    template.replacen(TON_INPUT_PLACEHOLDER, ton_input, 1)
}

pub(crate) fn marketing_prompt(
    customer_name: &str,
    products: &[ProductSummary],
    campaign: CampaignType,
) -> String {
    let product_list = products
        .iter()
        .map(|product| format!("- {} (${})", product.name, product.price))
        .collect::<Vec<_>>()
        .join("\n");

    match campaign {
        CampaignType::AbandonedCart => format!(
            "Genera un mensaje para {customer_name} recordándole que tiene productos en su carrito:\n{product_list}\n\nMensaje amigable y con sentido de urgencia."
        ),
        CampaignType::WeeklyOffer => format!(
            "Genera un mensaje de oferta semanal para {customer_name} con estos productos:\n{product_list}\n\nMensaje promocional atractivo."
        ),
        CampaignType::Marketing => format!(
            "Genera un mensaje de marketing personalizado para {customer_name} sobre estos productos:\n{product_list}\n\nMensaje persuasivo y personalizado."
        ),
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IntentError;

/// Subscription tier. Each tier widens the set of intents the model is
/// allowed to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Basic,
    Pro,
    Full,
}

/// Intent labels the model may emit. The wire form is the Spanish label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Saludo,
    PreguntaProducto,
    AgregarCarrito,
    ConsultarCarrito,
    ConfirmarPedido,
    CarritoAbandonado,
    OfertaPersonalizada,
    MensajeMarketing,
    Otro,
}

const BASIC_INTENTS: &[Intent] = &[Intent::Saludo, Intent::PreguntaProducto, Intent::Otro];

const PRO_INTENTS: &[Intent] = &[
    Intent::Saludo,
    Intent::PreguntaProducto,
    Intent::AgregarCarrito,
    Intent::ConsultarCarrito,
    Intent::ConfirmarPedido,
    Intent::Otro,
];

const FULL_INTENTS: &[Intent] = &[
    Intent::Saludo,
    Intent::PreguntaProducto,
    Intent::AgregarCarrito,
    Intent::ConsultarCarrito,
    Intent::ConfirmarPedido,
    Intent::CarritoAbandonado,
    Intent::OfertaPersonalizada,
    Intent::MensajeMarketing,
    Intent::Otro,
];

impl Plan {
    /// Intents offered to the model for this plan, in prompt order.
    /// `otro` is always last.
    pub fn intents(self) -> &'static [Intent] {
        match self {
            Plan::Basic => BASIC_INTENTS,
            Plan::Pro => PRO_INTENTS,
            Plan::Full => FULL_INTENTS,
        }
    }

    pub fn allows(self, intent: Intent) -> bool {
        self.intents().contains(&intent)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Basic => "basic",
            Plan::Pro => "pro",
            Plan::Full => "full",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Plan::Basic),
            "pro" => Ok(Plan::Pro),
            "full" => Ok(Plan::Full),
            other => Err(IntentError::InvalidConfig(format!("unknown plan {other:?}"))),
        }
    }
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Saludo => "saludo",
            Intent::PreguntaProducto => "pregunta_producto",
            Intent::AgregarCarrito => "agregar_carrito",
            Intent::ConsultarCarrito => "consultar_carrito",
            Intent::ConfirmarPedido => "confirmar_pedido",
            Intent::CarritoAbandonado => "carrito_abandonado",
            Intent::OfertaPersonalizada => "oferta_personalizada",
            Intent::MensajeMarketing => "mensaje_marketing",
            Intent::Otro => "otro",
        }
    }

    /// Parses a wire label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Intent> {
        FULL_INTENTS.iter().copied().find(|intent| intent.as_str() == label)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plans_are_nested() {
        for intent in Plan::Basic.intents() {
            assert!(Plan::Pro.allows(*intent));
        }
        for intent in Plan::Pro.intents() {
            assert!(Plan::Full.allows(*intent));
        }
        assert_eq!(Plan::Basic.intents().len(), 3);
        assert_eq!(Plan::Pro.intents().len(), 6);
        assert_eq!(Plan::Full.intents().len(), 9);
    }

    #[test]
    fn otro_is_always_last() {
        for plan in [Plan::Basic, Plan::Pro, Plan::Full] {
            assert_eq!(plan.intents().last(), Some(&Intent::Otro));
        }
    }

    #[test]
    fn basic_excludes_cart_intents() {
        assert!(!Plan::Basic.allows(Intent::AgregarCarrito));
        assert!(!Plan::Pro.allows(Intent::MensajeMarketing));
        assert!(Plan::Full.allows(Intent::MensajeMarketing));
    }

    #[test]
    fn labels_round_trip() {
        for intent in Plan::Full.intents() {
            assert_eq!(Intent::from_label(intent.as_str()), Some(*intent));
        }
        assert_eq!(Intent::from_label("comprar"), None);
    }

    #[test]
    fn plan_parses_case_insensitively() {
        assert_eq!("PRO".parse::<Plan>(), Ok(Plan::Pro));
        assert_eq!(" full ".parse::<Plan>(), Ok(Plan::Full));
        assert!("gold".parse::<Plan>().is_err());
        assert_eq!(Plan::default(), Plan::Basic);
    }

    #[test]
    fn serde_uses_wire_labels() {
        assert_eq!(serde_json::to_string(&Plan::Full).expect("ser"), "\"full\"");
        assert_eq!(
            serde_json::to_string(&Intent::PreguntaProducto).expect("ser"),
            "\"pregunta_producto\""
        );
    }
}

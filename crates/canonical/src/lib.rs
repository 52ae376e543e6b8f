//! tonbot canonical text layer.
//!
//! Everything that reaches the language model, or gets stored next to a
//! customer, goes through here first. The functions are small and pure:
//!
//! - [`normalize_text`] folds a WhatsApp message into lowercase ASCII words
//!   (accents removed, punctuation and emoji dropped, whitespace collapsed).
//! - [`collapse_whitespace`] only squeezes whitespace runs.
//! - [`digits_only`] / [`is_valid_whatsapp_number`] clean phone identifiers.
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. Same input, same output,
//! on any machine. None of these functions can fail.
//!
//! ```rust
//! use canonical::normalize_text;
//!
//! assert_eq!(normalize_text("¡Hola!  ¿Tienen CAFÉ?"), "hola tienen cafe");
//! ```

mod normalize;
mod phone;
mod whitespace;

pub use crate::normalize::normalize_text;
pub use crate::phone::{digits_only, is_valid_whatsapp_number};
pub use crate::whitespace::collapse_whitespace;

#[cfg(test)]
mod tests {
    use super::*;

    fn is_canonical(text: &str) -> bool {
        text.chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == ' ')
            && !text.contains("  ")
            && !text.starts_with(' ')
            && !text.ends_with(' ')
    }

    #[test]
    fn normalize_matches_canonical_alphabet() {
        let inputs = [
            "",
            "   ",
            "Hola, ¿cómo estás?",
            "Quiero 2 PIZZAS\n\ny una  coca-cola!!",
            "Ñandú   Pingüino\tÁrbol",
            "precio: $1.500 + envío (50%)",
            "emoji \u{1f600} test",
            "İstanbul ÆØÅ straße",
        ];

        for input in inputs {
            let out = normalize_text(input);
            assert!(is_canonical(&out), "{input:?} -> {out:?}");
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = ["Café con LECHE", "  a  b  ", "Ñoño-99 % off", "\u{1f600}"];
        for input in inputs {
            let once = normalize_text(input);
            assert_eq!(normalize_text(&once), once);
        }
    }

    #[test]
    fn normalize_and_phone_helpers_compose() {
        assert_eq!(normalize_text("+52 1 55 1234 5678"), "52 1 55 1234 5678");
        assert_eq!(digits_only("+52 1 55 1234 5678"), "5215512345678");
        assert!(is_valid_whatsapp_number("+52 1 55 1234 5678"));
    }
}

/// Keeps only the ASCII digits of `text`.
///
/// WhatsApp identifiers (`from`, `wa_id`, recipient numbers) are bare digit
/// strings, so anything else a sender or a config file adds (`+`, spaces,
/// dashes, parentheses) is removed here.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

/// WhatsApp accepts numbers between 7 and 15 digits once formatting is removed.
pub fn is_valid_whatsapp_number(phone: &str) -> bool {
    let digits = phone.chars().filter(|ch| ch.is_ascii_digit()).count();
    (7..=15).contains(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_only_strips_formatting() {
        assert_eq!(digits_only("+54 (11) 5555-0000"), "541155550000");
        assert_eq!(digits_only("wa:"), "");
        // Non-ASCII digits are not phone digits.
        assert_eq!(digits_only("١٢٣4"), "4");
    }

    #[test]
    fn whatsapp_number_length_bounds() {
        assert!(!is_valid_whatsapp_number("123456"));
        assert!(is_valid_whatsapp_number("1234567"));
        assert!(is_valid_whatsapp_number("+1 234 567 890 12345"));
        assert!(!is_valid_whatsapp_number("1234567890123456"));
    }
}

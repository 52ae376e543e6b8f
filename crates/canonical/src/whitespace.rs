//! Whitespace collapsing.
//!
//! Whitespace here means Unicode whitespace (`char::is_whitespace`): ASCII
//! space, tab, CR/LF, NBSP and the rest. Message bodies typed on phones are
//! full of NBSPs and doubled newlines, which is why this is Unicode-aware.

/// Collapses runs of whitespace into one ASCII space and trims both ends.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  hola \n\n mundo\u{00A0} "), "hola mundo");
/// assert_eq!(collapse_whitespace(" \t "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(segment);
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_collapsed_text_is_unchanged() {
        assert_eq!(collapse_whitespace("dos pizzas"), "dos pizzas");
    }

    #[test]
    fn windows_line_endings_become_single_spaces() {
        assert_eq!(collapse_whitespace("linea uno\r\nlinea dos"), "linea uno linea dos");
    }
}

use unicode_normalization::UnicodeNormalization;

use crate::whitespace::collapse_whitespace;

/// Combining Diacritical Marks block, left behind by NFD on accented letters.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Folds free text into the alphabet the assistant works with.
///
/// Steps, in order: lowercase, NFD decomposition, removal of combining
/// marks (U+0300..=U+036F), removal of every character that is not an ASCII
/// lowercase letter, ASCII digit or whitespace, whitespace collapsing and
/// trimming.
///
/// The output only contains `[a-z0-9 ]`, never has double spaces or edge
/// spaces, and `normalize_text(normalize_text(x)) == normalize_text(x)`.
///
/// Symbols such as `%` or `+` are dropped along with the rest of the
/// punctuation, so `"50% off"` becomes `"50 off"`.
///
/// ```rust
/// use canonical::normalize_text;
///
/// assert_eq!(normalize_text("  Pingüino   ÁRBOL! "), "pinguino arbol");
/// assert_eq!(normalize_text("¿Cuánto cuesta?"), "cuanto cuesta");
/// ```
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|ch| !COMBINING_MARKS.contains(ch))
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch.is_whitespace())
        .collect();

    collapse_whitespace(&folded)
}

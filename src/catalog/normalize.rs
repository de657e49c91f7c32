// ABOUTME: Alias normalization and display casing for ingredient names
// ABOUTME: Lowercase, NFD decomposition with mark removal, hyphen-collapsed slugs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingredient name normalization.
//!
//! [`normalize_alias`] is the single normalization function every alias,
//! display name, and free-text lookup goes through before touching the alias
//! index. It is pure and total: no input makes it fail, and only empty or
//! all-punctuation input produces an empty string.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize an alias or free-text ingredient reference to its index form.
///
/// Lowercases, strips diacritics (NFD decomposition, combining marks
/// removed), collapses every run of non-`[a-z0-9]` characters to a single
/// hyphen, and trims leading/trailing hyphens. `"Arroz Blanco"` and
/// `" arroz  blanco "` both normalize to `arroz-blanco`.
#[must_use]
pub fn normalize_alias(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let stripped: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let mut out = String::with_capacity(stripped.len());
    let mut pending_hyphen = false;
    for c in stripped.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Capitalize each whitespace-separated token for display.
///
/// `"arroz  blanco"` becomes `"Arroz Blanco"`. Blank input yields an empty
/// string.
#[must_use]
pub fn display_case(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_hyphenates() {
        assert_eq!(normalize_alias("Arroz Blanco"), "arroz-blanco");
        assert_eq!(normalize_alias("  arroz   blanco  "), "arroz-blanco");
        assert_eq!(normalize_alias("rice"), "rice");
    }

    #[test]
    fn test_normalize_strips_diacritics() {
        assert_eq!(normalize_alias("Azúcar"), "azucar");
        assert_eq!(normalize_alias("AJÍ DULCE"), "aji-dulce");
        assert_eq!(normalize_alias("crème fraîche"), "creme-fraiche");
    }

    #[test]
    fn test_normalize_collapses_punctuation_runs() {
        assert_eq!(normalize_alias("salsa -- lizano!"), "salsa-lizano");
        assert_eq!(normalize_alias("100% cacao"), "100-cacao");
    }

    #[test]
    fn test_normalize_trims_hyphens() {
        assert_eq!(normalize_alias("--arroz--"), "arroz");
        assert_eq!(normalize_alias("¡arroz!"), "arroz");
    }

    #[test]
    fn test_normalize_is_total() {
        assert_eq!(normalize_alias(""), "");
        assert_eq!(normalize_alias("   "), "");
        assert_eq!(normalize_alias("!!!"), "");
    }

    #[test]
    fn test_display_case() {
        assert_eq!(display_case("arroz blanco"), "Arroz Blanco");
        assert_eq!(display_case("  PAN   cuadrado "), "Pan Cuadrado");
        assert_eq!(display_case(""), "");
    }
}

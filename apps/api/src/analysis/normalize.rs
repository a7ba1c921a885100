//! Text normalization shared by every matching stage.
//!
//! All comparisons (JD text, resume text, declared skills, required skills)
//! go through `normalize_text` so they share one token space.

/// Lowercases `text` and replaces every run of characters that is not an
/// ASCII letter, digit, or whitespace with a single space, then trims.
///
/// Whitespace runs are preserved as-is; only "symbol" runs collapse.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_symbol_run = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
            out.push(c);
            in_symbol_run = false;
        } else if !in_symbol_run {
            out.push(' ');
            in_symbol_run = true;
        }
    }

    out.trim().to_string()
}

/// Splits already-normalized text into whitespace-separated tokens.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_keeps_digits() {
        assert_eq!(normalize_text("Python3 AND Go"), "python3 and go");
    }

    #[test]
    fn test_symbol_runs_collapse_to_single_space() {
        assert_eq!(normalize_text("CI/CD"), "ci cd");
        assert_eq!(normalize_text("Node.js"), "node js");
        assert_eq!(normalize_text("C++"), "c");
        assert_eq!(normalize_text("a--->b"), "a b");
    }

    #[test]
    fn test_whitespace_is_not_collapsed() {
        assert_eq!(normalize_text("rust  and\tgo"), "rust  and\tgo");
    }

    #[test]
    fn test_non_ascii_letters_become_spaces() {
        assert_eq!(normalize_text("résumé"), "r sum");
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("!!!"), "");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn test_tokens_split_on_whitespace() {
        let norm = normalize_text("Spring-Boot, Kafka");
        assert_eq!(tokens(&norm).collect::<Vec<_>>(), vec!["spring", "boot", "kafka"]);
    }
}

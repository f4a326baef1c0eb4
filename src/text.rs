//! Small text helpers for cleaning up lexicon headwords. Kept deliberately simple, we don't want
//! to change the spelling a model learns to produce, so normalisation is opt in.
use deunicode::deunicode;
use once_cell::sync::OnceCell;
use regex::Regex;

/// Removes the variant markers dictionaries use for words with multiple pronunciations, so
/// `BATH(2)` becomes `BATH`.
pub fn dict_normalise(x: &str) -> String {
    static VERSION_REGEX: OnceCell<Regex> = OnceCell::new();
    let version_regex = VERSION_REGEX.get_or_init(|| Regex::new(r#"\(\d+\)$"#).unwrap());

    version_regex.replace_all(x.trim(), "").into_owned()
}

/// ASCII folds, uppercases and drops punctuation.
pub fn normalise_text(x: &str) -> String {
    let mut s = deunicode(x);
    s.retain(valid_char);
    s.make_ascii_uppercase();

    s
}

fn valid_char(x: char) -> bool {
    !r#"!"£$%^&*()-_=+[{]};:'@#~,<.>/?|\`¬"#.contains(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_removal() {
        assert_eq!(dict_normalise("BATH(2)"), "BATH");
        assert_eq!(dict_normalise("HELLO!(45)"), "HELLO!");
        assert_eq!(dict_normalise("(3)d"), "(3)d");
    }

    #[test]
    fn folding() {
        assert_eq!(normalise_text("HELLO!"), "HELLO");
        assert_eq!(normalise_text("Bäckerinnen"), "BACKERINNEN");
        assert_eq!(normalise_text("(3)d"), "3D");
    }
}

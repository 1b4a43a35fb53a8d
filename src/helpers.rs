/// Normalize a word to a single capitalized form: first letter uppercased,
/// the rest lowercased (`"SAMSUNG"` → `"Samsung"`).
pub(crate) fn to_pascal_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

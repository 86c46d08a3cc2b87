use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\S+").expect("valid regex");
}

/// Every contiguous substring of the lower-cased name, paired with its
/// start position in chars. A name of L chars yields L*(L+1)/2 entries.
pub fn name_substrings(name: &str) -> Vec<(String, usize)> {
    let chars: Vec<char> = name.to_lowercase().chars().collect();
    let n = chars.len();
    let mut out = Vec::with_capacity(n * (n + 1) / 2);
    for start in 0..n {
        let mut sub = String::with_capacity(n - start);
        for &c in &chars[start..] {
            sub.push(c);
            out.push((sub.clone(), start));
        }
    }
    out
}

/// Lower-cased whitespace-delimited words of at least `min_len` chars.
/// Punctuation stays attached to the word.
pub fn description_words(text: &str, min_len: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() >= min_len)
        .map(str::to_string)
        .collect()
}

//! Locale-aware text segmentation.
//!
//! Splits raw prose into words, sentences, and paragraphs. Sentence
//! boundaries are a run of `.!?` followed by whitespace and an uppercase
//! letter of the target alphabet, or the end of the text; the delimiter run
//! is consumed. All functions are pure and total.
//!
//! Known boundary behavior: text with no terminal punctuation yields a
//! single sentence (the whole string), and a delimiter not followed by a
//! capital of the target alphabet does not split. This mirrors the
//! delimiter-lookahead definition and is intentionally left uncorrected.

use crate::models::Language;

/// Uppercase letters that can open a sentence in the target alphabet.
fn is_sentence_capital(c: char, language: Language) -> bool {
    if c.is_ascii_uppercase() {
        return true;
    }
    match language {
        Language::Lv => "ĀČĒĢĪĶĻŅŠŪŽ".contains(c),
        Language::Ru => "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ".contains(c),
        Language::En => false,
    }
}

/// Split text into whitespace-delimited words, dropping empty tokens.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Count whitespace-delimited words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split text into sentences using the language-specific delimiter rule.
///
/// The terminal punctuation run is consumed; results are trimmed and empty
/// results dropped.
pub fn split_sentences(text: &str, language: Language) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        if matches!(chars[i], '.' | '!' | '?') {
            // Extend over the whole punctuation run
            let mut after_run = i + 1;
            while after_run < chars.len() && matches!(chars[after_run], '.' | '!' | '?') {
                after_run += 1;
            }

            // Boundary if the run ends the text, or whitespace followed by a
            // capital of the target alphabet comes next
            let mut next = after_run;
            while next < chars.len() && chars[next].is_whitespace() {
                next += 1;
            }
            let boundary = after_run == chars.len()
                || (next > after_run
                    && next < chars.len()
                    && is_sentence_capital(chars[next], language));

            if boundary {
                push_trimmed(&mut sentences, &chars[start..i]);
                start = after_run;
            }
            i = after_run;
        } else {
            i += 1;
        }
    }

    if start < chars.len() {
        push_trimmed(&mut sentences, &chars[start..]);
    }

    sentences
}

fn push_trimmed(out: &mut Vec<String>, chars: &[char]) {
    let s: String = chars.iter().collect();
    let trimmed = s.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

/// Split text on blank lines into trimmed, non-empty paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .collect()
}

//! Local metrics engine.
//!
//! Derives quantitative measures from segmented text: a localized
//! Flesch-family readability score, long-sentence and passive-voice
//! detection, word repetition, and vague-word flagging. The passive-voice
//! and vague-word detectors are regex heuristics, not grammatical parses;
//! false positives and negatives are expected. The Russian formula
//! coefficients and the pattern tables are kept as-is for behavioral parity
//! with the editorial guidelines they were tuned against.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::compliance::assess_compliance;
use crate::config::AnalysisConfig;
use crate::models::{Language, TextMetrics};
use crate::segment::{count_words, split_paragraphs, split_sentences};

static PASSIVE_LV: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\btiek\s+\w+",
        r"(?i)\btika\s+\w+",
        r"(?i)\btiks\s+\w+",
        r"(?i)\btop\s+\w+",
        r"(?i)\btika\s+\w+(t[sa]|t[īi]|šan[as])",
        r"(?i)\btiek\s+\w+(t[sa]|t[īi]|šan[as])",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid passive-voice pattern"))
    .collect()
});

static PASSIVE_RU: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Reflexive verbs
        r"(?i)\b\w+(ся|сь)\b",
        r"(?i)\b(был|была|было|были|будет|будут)\s+\w+(н|т|м)\w*\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid passive-voice pattern"))
    .collect()
});

static PASSIVE_EN: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(is|are|was|were|been|being)\s+\w+ed\b",
        r"(?i)\b(is|are|was|were|been|being)\s+(being\s+)?\w+en\b",
        r"(?i)\bgets?\s+\w+ed\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid passive-voice pattern"))
    .collect()
});

static VAGUE_LV: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(daudz|daži|vairāki|zināmā mērā|savā ziņā|varētu būt|iespējams|šķiet)\b",
        r"(?i)\b(lieta|lietas|process|procesi|jautājums|jautājumi)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid vague-word pattern"))
    .collect()
});

static VAGUE_RU: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(много|несколько|некоторые|возможно|вероятно|кажется|может быть)\b",
        r"(?i)\b(вещь|вещи|процесс|процессы|вопрос|вопросы)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid vague-word pattern"))
    .collect()
});

static VAGUE_EN: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?i)\b(very|really|quite|some|many|few|thing|things|stuff|probably|maybe)\b"]
        .iter()
        .map(|p| Regex::new(p).expect("invalid vague-word pattern"))
        .collect()
});

/// Letters counted as word characters when stripping punctuation: ASCII word
/// chars plus Latvian diacritic vowels/consonants and Cyrillic.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || "āčēģīķļņšūž".contains(c)
        || ('а'..='я').contains(&c)
        || c == 'ё'
}

fn strip_punctuation(word: &str) -> String {
    word.chars().filter(|c| is_word_char(*c)).collect()
}

/// Estimate the total syllable count of a text.
///
/// Latvian and Russian count vowels individually; English counts vowel
/// clusters with a silent-trailing-`e` adjustment and a floor of one
/// syllable per word.
pub fn estimate_syllables(text: &str, language: Language) -> usize {
    let lowered = text.to_lowercase();

    lowered
        .split_whitespace()
        .map(|word| {
            let clean = strip_punctuation(word);
            if clean.is_empty() {
                return 0;
            }
            match language {
                Language::Lv => clean.chars().filter(|c| "aāeēiīouū".contains(*c)).count(),
                Language::Ru => clean.chars().filter(|c| "аеёиоуыэюя".contains(*c)).count(),
                Language::En => {
                    let mut clusters = 0usize;
                    let mut in_vowel = false;
                    for c in clean.chars() {
                        let vowel = "aeiouy".contains(c);
                        if vowel && !in_vowel {
                            clusters += 1;
                        }
                        in_vowel = vowel;
                    }
                    if clean.ends_with('e') {
                        clusters = clusters.saturating_sub(1);
                    }
                    clusters.max(1)
                }
            }
        })
        .sum()
}

/// Localized Flesch-family readability score, rounded and clamped to [0, 100].
///
/// Returns 0 for degenerate input (no words or no sentences).
pub fn readability_score(text: &str, language: Language) -> u8 {
    let sentence_count = split_sentences(text, language).len();
    let word_count = count_words(text);

    if sentence_count == 0 || word_count == 0 {
        return 0;
    }

    let avg_wps = word_count as f64 / sentence_count as f64;
    let avg_spw = estimate_syllables(text, language) as f64 / word_count as f64;

    let score = match language {
        Language::Ru => 206.835 - 1.3 * avg_wps - 60.1 * avg_spw,
        Language::Lv | Language::En => 206.835 - 1.015 * avg_wps - 84.6 * avg_spw,
    };

    score.round().clamp(0.0, 100.0) as u8
}

/// Average words per sentence, rounded to one decimal. 0 with no sentences.
pub fn avg_words_per_sentence(text: &str, language: Language) -> f64 {
    let sentence_count = split_sentences(text, language).len();
    if sentence_count == 0 {
        return 0.0;
    }
    round1(count_words(text) as f64 / sentence_count as f64)
}

/// Sentences whose word count exceeds `threshold`.
pub fn find_long_sentences(text: &str, language: Language, threshold: usize) -> Vec<String> {
    split_sentences(text, language)
        .into_iter()
        .filter(|s| count_words(s) > threshold)
        .collect()
}

/// Sentences matching the per-language passive-voice pattern set.
pub fn detect_passive_voice(text: &str, language: Language) -> Vec<String> {
    let patterns: &[Regex] = match language {
        Language::Lv => &PASSIVE_LV,
        Language::Ru => &PASSIVE_RU,
        Language::En => &PASSIVE_EN,
    };

    split_sentences(text, language)
        .into_iter()
        .filter(|s| patterns.iter().any(|p| p.is_match(s)))
        .collect()
}

/// Vague or weak words found in the text, deduplicated, in match order.
pub fn detect_vague_words(text: &str, language: Language) -> Vec<String> {
    let patterns: &[Regex] = match language {
        Language::Lv => &VAGUE_LV,
        Language::Ru => &VAGUE_RU,
        Language::En => &VAGUE_EN,
    };

    let mut matches = Vec::new();
    for pattern in patterns {
        for m in pattern.find_iter(text) {
            let word = m.as_str().to_string();
            if !matches.contains(&word) {
                matches.push(word);
            }
        }
    }
    matches
}

/// Ratio of unique long words to total long words, scaled to 0–100.
///
/// 100 means no repetition; empty input vacuously scores 100. Only
/// case-folded, punctuation-stripped words longer than `min_word_len`
/// characters are counted.
pub fn word_repetition_score(text: &str, min_word_len: usize) -> u8 {
    let lowered = text.to_lowercase();
    let words: Vec<String> = lowered
        .split_whitespace()
        .map(strip_punctuation)
        .filter(|w| w.chars().count() > min_word_len)
        .collect();

    if words.is_empty() {
        return 100;
    }

    let unique = words
        .iter()
        .collect::<std::collections::HashSet<_>>()
        .len();

    ((unique as f64 / words.len() as f64) * 100.0).round() as u8
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Compute the full local metrics structure for a text.
pub fn compute_metrics(text: &str, language: Language, config: &AnalysisConfig) -> TextMetrics {
    let word_count = count_words(text);
    let sentence_count = split_sentences(text, language).len();
    let paragraph_count = split_paragraphs(text).len();
    let avg_wps = avg_words_per_sentence(text, language);
    let readability = readability_score(text, language);
    let long_sentences =
        find_long_sentences(text, language, config.long_sentence_threshold).len();

    let passive_count = detect_passive_voice(text, language).len();
    let passive_pct = percentage(passive_count, sentence_count);
    let long_pct = percentage(long_sentences, sentence_count);

    let avg_paragraph_length = if paragraph_count > 0 {
        round1(sentence_count as f64 / paragraph_count as f64)
    } else {
        0.0
    };

    let repetition = word_repetition_score(text, config.repetition_min_word_len);

    let compliance = assess_compliance(avg_wps, passive_pct, readability, long_pct);

    TextMetrics {
        word_count,
        sentence_count,
        paragraph_count,
        avg_words_per_sentence: avg_wps,
        readability_score: readability,
        complex_sentences: long_sentences,
        passive_voice_count: Some(passive_count),
        passive_voice_percentage: Some(passive_pct),
        long_sentences_count: Some(long_sentences),
        long_sentences_percentage: Some(long_pct),
        avg_paragraph_length: Some(avg_paragraph_length),
        word_repetition_score: Some(repetition),
        guideline_compliance: Some(compliance),
    }
}

fn percentage(count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u8
}

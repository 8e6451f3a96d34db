//! Guideline compliance scoring.
//!
//! Maps raw metrics onto qualitative tiers per editorial dimension and a
//! weighted overall score. Pure and deterministic; the golden-value tests
//! below pin the exact band boundaries.

use crate::models::{ComplianceTier, GuidelineCompliance};

/// Assess compliance from average words per sentence, passive-voice
/// percentage, readability score, and long-sentence percentage.
///
/// The overall score weights sentence length and active voice at 0.3 each
/// and readability at 0.4.
pub fn assess_compliance(
    avg_words_per_sentence: f64,
    passive_voice_pct: u8,
    readability_score: u8,
    long_sentences_pct: u8,
) -> GuidelineCompliance {
    // Sentence length (ideal: 15-20 words)
    let (mut sentence_length, mut sentence_length_score) =
        if (15.0..=20.0).contains(&avg_words_per_sentence) {
            (ComplianceTier::Excellent, 100u32)
        } else if (12.0..=25.0).contains(&avg_words_per_sentence) {
            (ComplianceTier::Good, 80)
        } else if (10.0..=30.0).contains(&avg_words_per_sentence) {
            (ComplianceTier::Fair, 60)
        } else {
            (ComplianceTier::Poor, 40)
        };

    // Demote when too many individual sentences run long
    if long_sentences_pct > 30 {
        sentence_length_score = sentence_length_score.saturating_sub(20).max(40);
        if sentence_length_score <= 50 {
            sentence_length = ComplianceTier::Poor;
        }
    }

    // Active voice (passive share should stay low)
    let (active_voice, active_voice_score) = if passive_voice_pct <= 5 {
        (ComplianceTier::Excellent, 100u32)
    } else if passive_voice_pct <= 15 {
        (ComplianceTier::Good, 80)
    } else if passive_voice_pct <= 30 {
        (ComplianceTier::Fair, 60)
    } else {
        (ComplianceTier::Poor, 40)
    };

    // Clarity follows readability directly
    let clarity = if readability_score >= 70 {
        ComplianceTier::Excellent
    } else if readability_score >= 60 {
        ComplianceTier::Good
    } else if readability_score >= 50 {
        ComplianceTier::Fair
    } else {
        ComplianceTier::Poor
    };

    let overall = (sentence_length_score as f64 * 0.3
        + active_voice_score as f64 * 0.3
        + readability_score as f64 * 0.4)
        .round() as u8;

    GuidelineCompliance {
        sentence_length,
        active_voice,
        clarity,
        overall,
    }
}

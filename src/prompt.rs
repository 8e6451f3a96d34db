//! Analysis prompt assembly.
//!
//! Merges the input text, settings, prioritized guidelines, and matching
//! knowledge-base excerpts into a single instruction string by substituting
//! the placeholders of a versioned template. Templates are validated for
//! placeholder completeness before they are accepted into the admin store.

use crate::models::{Guideline, KnowledgeBaseArticle, TextSettings};

/// Placeholders every template must contain, each consumed exactly once.
pub const REQUIRED_PLACEHOLDERS: [&str; 5] =
    ["{language}", "{category}", "{style}", "{guidelines}", "{text}"];

/// The seeded analysis template, demanding the JSON response shape the
/// normalization layer expects.
pub const DEFAULT_TEMPLATE: &str = r#"Tu esi profesionāls teksta redaktors {language} valodā.
Analizē šo tekstu pēc šādiem kritērijiem:

VADLĪNIJAS:
{guidelines}

KATEGORIJA: {category}
STILS: {style}

TEKSTS:
{text}

Atgriezies JSON formātā ar šādu struktūru:
{
  "readability_score": 0-100,
  "issues": [
    {
      "type": "readability|grammar|style|complexity",
      "severity": "low|medium|high",
      "sentence": "problēmatiskais teikums",
      "suggestion": "ieteikums uzlabojumam",
      "position": {"start": 0, "end": 0}
    }
  ],
  "summary": "• Bullet point 1\n• Bullet point 2\n• Bullet point 3",
  "metrics": {
    "wordCount": 0,
    "sentenceCount": 0,
    "paragraphCount": 0,
    "avgWordsPerSentence": 0,
    "readabilityScore": 0,
    "complexSentences": 0
  }
}"#;

/// Outcome of checking a template for required placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateValidation {
    pub valid: bool,
    pub missing_placeholders: Vec<String>,
}

/// Check that a template contains every required placeholder.
pub fn validate_template(template: &str) -> TemplateValidation {
    let missing: Vec<String> = REQUIRED_PLACEHOLDERS
        .iter()
        .filter(|p| !template.contains(*p))
        .map(|p| p.to_string())
        .collect();

    TemplateValidation {
        valid: missing.is_empty(),
        missing_placeholders: missing,
    }
}

/// Assemble the analysis prompt from a template.
///
/// Guidelines are rendered in priority-descending order (stable for ties);
/// knowledge-base articles are filtered on exact language and category
/// match and appended as truncated excerpts. Each placeholder is
/// substituted exactly once.
pub fn build_prompt(
    text: &str,
    settings: &TextSettings,
    guidelines: &[Guideline],
    knowledge_base: &[KnowledgeBaseArticle],
    template: &str,
    excerpt_max_chars: usize,
) -> String {
    let mut sorted: Vec<&Guideline> = guidelines.iter().collect();
    sorted.sort_by(|a, b| b.priority.cmp(&a.priority));

    let guidelines_text = sorted
        .iter()
        .enumerate()
        .map(|(index, g)| format!("{}. {}:\n{}", index + 1, g.name, g.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    let relevant: Vec<&KnowledgeBaseArticle> = knowledge_base
        .iter()
        .filter(|a| a.language == settings.language && a.category == settings.category)
        .collect();

    let knowledge_text = if relevant.is_empty() {
        String::new()
    } else {
        let excerpts = relevant
            .iter()
            .map(|a| format!("- {}:\n{}", a.title, excerpt(&a.content, excerpt_max_chars)))
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("\n\nLABU RAKSTU PIEMĒRI:\n{}", excerpts)
    };

    template
        .replacen("{language}", settings.language.label(), 1)
        .replacen("{category}", settings.category.label(), 1)
        .replacen("{style}", settings.style.label(), 1)
        .replacen(
            "{guidelines}",
            &format!("{}{}", guidelines_text, knowledge_text),
            1,
        )
        .replacen("{text}", text, 1)
}

/// Truncate content to the excerpt budget, char-safe, with an ellipsis
/// marker when anything was cut.
fn excerpt(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let cut: String = content.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Language, Style};
    use chrono::Utc;

    fn settings() -> TextSettings {
        TextSettings {
            language: Language::Lv,
            category: Category::News,
            style: Style::Formal,
        }
    }

    fn guideline(name: &str, priority: u8) -> Guideline {
        Guideline {
            id: name.to_string(),
            name: name.to_string(),
            content: format!("{} saturs", name),
            priority,
            created_at: Utc::now(),
        }
    }

    fn article(title: &str, language: Language, category: Category) -> KnowledgeBaseArticle {
        KnowledgeBaseArticle {
            id: title.to_string(),
            title: title.to_string(),
            content: "Labs raksta saturs.".to_string(),
            category,
            language,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_template_complete() {
        let validation = validate_template(DEFAULT_TEMPLATE);
        assert!(validation.valid);
        assert!(validation.missing_placeholders.is_empty());
    }

    #[test]
    fn test_validate_template_missing() {
        let validation = validate_template("{language} {category} {text}");
        assert!(!validation.valid);
        assert_eq!(
            validation.missing_placeholders,
            vec!["{style}".to_string(), "{guidelines}".to_string()]
        );
    }

    #[test]
    fn test_build_prompt_consumes_all_placeholders() {
        let prompt = build_prompt(
            "Teksta saturs.",
            &settings(),
            &[guideline("Pirmā", 5)],
            &[],
            DEFAULT_TEMPLATE,
            300,
        );
        for placeholder in REQUIRED_PLACEHOLDERS {
            assert!(
                !prompt.contains(placeholder),
                "unsubstituted placeholder {} in prompt",
                placeholder
            );
        }
        assert!(prompt.contains("latviešu"));
        assert!(prompt.contains("Ziņas"));
        assert!(prompt.contains("Formāls"));
        assert!(prompt.contains("Teksta saturs."));
    }

    #[test]
    fn test_guidelines_priority_order_stable() {
        let prompt = build_prompt(
            "t",
            &settings(),
            &[
                guideline("Zema", 2),
                guideline("Augsta", 9),
                guideline("Vidēja-a", 5),
                guideline("Vidēja-b", 5),
            ],
            &[],
            "{language}{category}{style}{text}\n{guidelines}",
            300,
        );
        let a = prompt.find("1. Augsta:").unwrap();
        let b = prompt.find("2. Vidēja-a:").unwrap();
        let c = prompt.find("3. Vidēja-b:").unwrap();
        let d = prompt.find("4. Zema:").unwrap();
        assert!(a < b && b < c && c < d);
    }

    #[test]
    fn test_knowledge_base_filtered_by_settings() {
        let prompt = build_prompt(
            "t",
            &settings(),
            &[],
            &[
                article("Atbilstošs", Language::Lv, Category::News),
                article("Cita valoda", Language::En, Category::News),
                article("Cita kategorija", Language::Lv, Category::Sports),
            ],
            "{language}{category}{style}{text}\n{guidelines}",
            300,
        );
        assert!(prompt.contains("LABU RAKSTU PIEMĒRI:"));
        assert!(prompt.contains("Atbilstošs"));
        assert!(!prompt.contains("Cita valoda"));
        assert!(!prompt.contains("Cita kategorija"));
    }

    #[test]
    fn test_no_matching_articles_no_examples_block() {
        let prompt = build_prompt(
            "t",
            &settings(),
            &[guideline("Viena", 1)],
            &[article("Cits", Language::En, Category::Sports)],
            "{language}{category}{style}{text}\n{guidelines}",
            300,
        );
        assert!(!prompt.contains("LABU RAKSTU PIEMĒRI:"));
    }

    #[test]
    fn test_excerpt_truncation() {
        let mut long_article = article("Garš", Language::Lv, Category::News);
        long_article.content = "x".repeat(500);
        let prompt = build_prompt(
            "t",
            &settings(),
            &[],
            &[long_article],
            "{language}{category}{style}{text}\n{guidelines}",
            300,
        );
        assert!(prompt.contains(&format!("{}...", "x".repeat(300))));
        assert!(!prompt.contains(&"x".repeat(301)));
    }
}

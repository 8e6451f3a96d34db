//! End-to-end tests for the analysis pipeline, driven through the library
//! with a scripted mock backend standing in for the generative service.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;

use prose_harness::config::{Config, GenerativeConfig, ModelVariant};
use prose_harness::generative::GenerativeBackend;
use prose_harness::models::{
    Category, Guideline, KnowledgeBaseArticle, Language, Style, TextSettings,
};
use prose_harness::store::{default_admin_data, FileAdminStore};
use prose_harness::{AnalysisError, AnalyzeRequest, Analyzer};

/// One scripted backend reaction.
enum Script {
    Text(&'static str),
    Error(&'static str),
    /// Never completes; the client's deadline must fire.
    Hang,
}

struct MockBackend {
    script: Mutex<VecDeque<Script>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockBackend {
    fn new(script: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn models_called(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    fn last_prompt(&self) -> String {
        self.calls.lock().unwrap().last().map(|(_, p)| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate(&self, prompt: &str, model: &ModelVariant) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((model.id.clone(), prompt.to_string()));

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Script::Text(text)) => Ok(text.to_string()),
            Some(Script::Error(message)) => bail!("{}", message),
            Some(Script::Hang) | None => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                bail!("unreachable")
            }
        }
    }
}

/// Two fast models, two attempts each, 50 ms deadline.
fn test_config() -> Config {
    let mut config = Config::default();
    config.generative = GenerativeConfig {
        api_key_env: "PROSE_HARNESS_TEST_KEY".to_string(),
        models: vec![
            ModelVariant {
                id: "mock-fast".to_string(),
                temperature: 0.7,
                max_output_tokens: 2048,
            },
            ModelVariant {
                id: "mock-stable".to_string(),
                temperature: 0.7,
                max_output_tokens: 2048,
            },
        ],
        retries: 2,
        timeout_ms: 50,
        backoff_base_ms: 1,
    };
    config
}

fn settings() -> TextSettings {
    TextSettings {
        language: Language::Lv,
        category: Category::News,
        style: Style::Formal,
    }
}

const SAMPLE_TEXT: &str =
    "Šis ir teikums. Šis ir otrs teikums ar vairākiem vārdiem lai pagarinātu to.";

const VALID_RESPONSE: &str = r#"{
  "readability_score": 66,
  "issues": [{
    "type": "complexity",
    "severity": "low",
    "sentence": "Šis ir otrs teikums ar vairākiem vārdiem lai pagarinātu to",
    "suggestion": "Sadali teikumu divos.",
    "position": {"start": 16, "end": 75}
  }],
  "summary": "• Teksts ir viegli lasāms\n• Viens garāks teikums",
  "metrics": {
    "wordCount": 13,
    "sentenceCount": 2,
    "paragraphCount": 1,
    "avgWordsPerSentence": 6.5,
    "readabilityScore": 66,
    "complexSentences": 0
  }
}"#;

fn request(debug: bool) -> AnalyzeRequest {
    AnalyzeRequest {
        text: SAMPLE_TEXT.to_string(),
        settings: settings(),
        prompt: "Analizē šo tekstu.".to_string(),
        debug,
    }
}

#[tokio::test]
async fn test_analysis_merges_service_response() {
    let backend = MockBackend::new(vec![Script::Text(VALID_RESPONSE)]);
    let analyzer = Analyzer::new(test_config(), backend.clone());

    let result = analyzer.analyze(&request(false)).await.unwrap();

    assert_eq!(result.readability_score, 66);
    assert_eq!(result.metrics.readability_score, 66);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].suggestion, "Sadali teikumu divos.");
    assert!(!result.issues[0].accepted);
    assert!(result.summary.starts_with("• "));
    // Local segmentation agrees with the manual count
    assert_eq!(result.metrics.word_count, 13);
    assert_eq!(result.metrics.sentence_count, 2);
    // Local-only metrics survive the merge
    assert!(result.metrics.word_repetition_score.is_some());
    assert!(result.metrics.guideline_compliance.is_some());
    assert_eq!(backend.call_count(), 1);
    assert!(result.diagnostics.is_none());
}

#[tokio::test]
async fn test_retries_after_malformed_output() {
    let backend = MockBackend::new(vec![
        Script::Text("I could not produce JSON, sorry."),
        Script::Text(VALID_RESPONSE),
    ]);
    let analyzer = Analyzer::new(test_config(), backend.clone());

    let result = analyzer.analyze(&request(false)).await.unwrap();

    assert_eq!(backend.call_count(), 2);
    assert_eq!(result.readability_score, 66);
}

#[tokio::test]
async fn test_model_fallback_after_errors() {
    let backend = MockBackend::new(vec![
        Script::Error("quota exceeded"),
        Script::Error("quota exceeded"),
        Script::Text(VALID_RESPONSE),
    ]);
    let analyzer = Analyzer::new(test_config(), backend.clone());

    let result = analyzer.analyze(&request(true)).await.unwrap();

    assert_eq!(result.readability_score, 66);
    assert_eq!(
        backend.models_called(),
        vec!["mock-fast", "mock-fast", "mock-stable"]
    );

    let diagnostics = result.diagnostics.unwrap();
    assert!(!diagnostics.fallback_used);
    assert_eq!(diagnostics.attempts.len(), 3);
    assert_eq!(diagnostics.attempts[2].outcome, "ok");
    assert_eq!(diagnostics.attempts[2].model, "mock-stable");
}

#[tokio::test]
async fn test_timeout_exhaustion_degrades_within_bound() {
    // Every attempt hangs past the deadline (the empty tail of the script
    // behaves like Hang too).
    let backend = MockBackend::new(vec![Script::Hang]);
    let config = test_config();
    let models = config.generative.models.len() as u64;
    let retries = config.generative.retries as u64;
    let analyzer = Analyzer::new(config.clone(), backend.clone());

    let started = Instant::now();
    let result = analyzer.analyze(&request(true)).await.unwrap();
    let elapsed = started.elapsed();

    // models × retries × timeout plus backoff, with generous slack
    let bound = Duration::from_millis(
        models * retries * config.generative.timeout_ms
            + 10 * config.generative.backoff_base_ms
            + 1500,
    );
    assert!(elapsed < bound, "took {:?}, bound {:?}", elapsed, bound);

    // Degraded but structurally complete
    assert!(result.issues.is_empty());
    assert!(!result.summary.is_empty());
    assert!(result.summary.starts_with("• "));
    assert_eq!(result.readability_score, result.metrics.readability_score);
    // Score comes from the local engine
    assert_eq!(result.metrics.word_count, 13);
    assert_eq!(result.metrics.sentence_count, 2);
    assert!(result.readability_score <= 100);

    let diagnostics = result.diagnostics.unwrap();
    assert!(diagnostics.fallback_used);
    assert_eq!(diagnostics.attempts.len(), (models * retries) as usize);
    assert!(diagnostics.attempts.iter().all(|a| a.timed_out));
}

#[tokio::test]
async fn test_invalid_requests_rejected_before_any_call() {
    let backend = MockBackend::new(vec![Script::Text(VALID_RESPONSE)]);
    let analyzer = Analyzer::new(test_config(), backend.clone());

    let mut empty = request(false);
    empty.text = "   ".to_string();
    assert!(matches!(
        analyzer.analyze(&empty).await,
        Err(AnalysisError::InvalidRequest(_))
    ));

    let mut oversized = request(false);
    oversized.text = "a ".repeat(30_000);
    assert!(matches!(
        analyzer.analyze(&oversized).await,
        Err(AnalysisError::InvalidRequest(_))
    ));

    let mut no_prompt = request(false);
    no_prompt.prompt = String::new();
    assert!(matches!(
        analyzer.analyze(&no_prompt).await,
        Err(AnalysisError::InvalidRequest(_))
    ));

    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_analyze_with_store_assembles_prompt() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FileAdminStore::new(tmp.path().join("admin.json"));

    let mut data = default_admin_data();
    data.guidelines.push(Guideline {
        id: "g1".to_string(),
        name: "Īsi teikumi".to_string(),
        content: "Raksti teikumus līdz 20 vārdiem.".to_string(),
        priority: 9,
        created_at: Utc::now(),
    });
    data.knowledge_base.push(KnowledgeBaseArticle {
        id: "a1".to_string(),
        title: "Paraugraksts".to_string(),
        content: "Šis ir labi uzrakstīts ziņu raksts.".to_string(),
        category: Category::News,
        language: Language::Lv,
        created_at: Utc::now(),
    });
    store.write(&data).await.unwrap();

    let backend = MockBackend::new(vec![Script::Text(VALID_RESPONSE)]);
    let analyzer = Analyzer::new(test_config(), backend.clone());

    let result = analyzer
        .analyze_with_store(&store, SAMPLE_TEXT, &settings(), false)
        .await
        .unwrap();
    assert_eq!(result.readability_score, 66);

    let prompt = backend.last_prompt();
    assert!(prompt.contains("1. Īsi teikumi:"));
    assert!(prompt.contains("LABU RAKSTU PIEMĒRI:"));
    assert!(prompt.contains("Paraugraksts"));
    assert!(prompt.contains(SAMPLE_TEXT));
    assert!(prompt.contains("latviešu"));
    assert!(!prompt.contains("{text}"));
}

#[tokio::test]
async fn test_missing_active_template_is_configuration_error() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FileAdminStore::new(tmp.path().join("admin.json"));

    let mut data = default_admin_data();
    data.active_prompt_id = None;
    data.system_prompts.clear();
    store.write(&data).await.unwrap();

    let backend = MockBackend::new(vec![Script::Text(VALID_RESPONSE)]);
    let analyzer = Analyzer::new(test_config(), backend.clone());

    let result = analyzer
        .analyze_with_store(&store, SAMPLE_TEXT, &settings(), false)
        .await;
    assert!(matches!(result, Err(AnalysisError::Configuration(_))));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_summarize_and_fallback() {
    let backend = MockBackend::new(vec![Script::Text("• Pirmais punkts\n• Otrais punkts")]);
    let analyzer = Analyzer::new(test_config(), backend.clone());

    let summary = analyzer.summarize(SAMPLE_TEXT, Language::Lv).await.unwrap();
    assert_eq!(summary, "• Pirmais punkts\n• Otrais punkts");

    // Exhaustion degrades to the placeholder
    let failing = MockBackend::new(vec![
        Script::Error("boom"),
        Script::Error("boom"),
        Script::Error("boom"),
        Script::Error("boom"),
    ]);
    let analyzer = Analyzer::new(test_config(), failing.clone());
    let summary = analyzer.summarize(SAMPLE_TEXT, Language::Lv).await.unwrap();
    assert_eq!(summary, "Kopsavilkums nav pieejams");
    assert_eq!(failing.call_count(), 4);
}

#[tokio::test]
async fn test_suggestions_parsed_and_capped() {
    let response = "Ieteikumi:\n1. Saīsini teikumus\n2. Izvairies no pasīvās kārtas\n\
                    3. Lieto konkrētus vārdus\n4. Sadali rindkopas\n5. Pārbaudi virsrakstu\n\
                    6. Vēl viens\n7. Un vēl";
    let backend = MockBackend::new(vec![Script::Text(response)]);
    let analyzer = Analyzer::new(test_config(), backend);

    let suggestions = analyzer
        .suggestions(SAMPLE_TEXT, Language::Lv)
        .await
        .unwrap();
    assert_eq!(suggestions.len(), 5);
    assert_eq!(suggestions[0], "Saīsini teikumus");
    assert_eq!(suggestions[4], "Pārbaudi virsrakstu");
}

#[tokio::test]
async fn test_suggestions_degrade_to_empty() {
    let backend = MockBackend::new(vec![
        Script::Error("boom"),
        Script::Error("boom"),
        Script::Error("boom"),
        Script::Error("boom"),
    ]);
    let analyzer = Analyzer::new(test_config(), backend);

    let suggestions = analyzer
        .suggestions(SAMPLE_TEXT, Language::Lv)
        .await
        .unwrap();
    assert!(suggestions.is_empty());
}

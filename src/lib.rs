//! # Prose Harness
//!
//! A readability and style analysis engine for multilingual newsroom prose
//! (Latvian, Russian, English).
//!
//! Prose Harness combines deterministic local text metrics (segmentation,
//! a localized Flesch-family readability score, passive-voice and
//! repetition heuristics, guideline compliance) with qualitative analysis
//! from an external generative-text service. The generative side is wrapped
//! defensively: retries across model variants, hard deadlines, JSON
//! extraction and total normalization, and a locally synthesized fallback,
//! so an analysis never fails because the service did.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌────────────┐
//! │ Segmenter  │──▶│ Metrics  │──▶│ Compliance │  (local path,
//! │ words/sent │   │ Engine   │   │ Scorer     │   always succeeds)
//! └───────────┘   └────┬─────┘   └─────┬──────┘
//!                      │               │
//! ┌───────────┐   ┌────▼─────────────▼─────┐
//! │  Prompt   │──▶│      Generative        │
//! │ Assembler │   │ Client + Normalization │
//! └─────┬─────┘   └──────────┬─────────────┘
//!       │                    │
//!  AdminStore          ┌─────▼──────┐
//!  (guidelines, KB,    │   Merger   │──▶ AnalysisResult
//!   prompt template)   └────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and tuning constants |
//! | [`models`] | Core data types |
//! | [`segment`] | Word/sentence/paragraph splitting |
//! | [`metrics`] | Readability and heuristic detectors |
//! | [`compliance`] | Guideline compliance scoring |
//! | [`prompt`] | Prompt assembly and template validation |
//! | [`store`] | Admin dataset boundary (guidelines, KB, templates) |
//! | [`generative`] | Generative backend trait and Gemini implementation |
//! | [`normalize`] | Service response normalization |
//! | [`client`] | Retry/fallback client and diagnostics |
//! | [`merge`] | Local/service result reconciliation |
//! | [`analyze`] | Caller-facing analysis operations |
//! | [`validate`] | Request validation |
//! | [`limit`] | Injectable request limiter |
//! | [`error`] | Caller-visible error taxonomy |

pub mod analyze;
pub mod client;
pub mod compliance;
pub mod config;
pub mod error;
pub mod generative;
pub mod limit;
pub mod merge;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod prompt;
pub mod segment;
pub mod store;
pub mod validate;

pub use analyze::{AnalyzeRequest, Analyzer};
pub use error::{AnalysisError, Result};

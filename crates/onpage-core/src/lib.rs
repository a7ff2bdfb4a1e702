//! # Onpage Core
//!
//! Shared, WASM-safe logic for Onpage: content models, markup scanning,
//! the on-page SEO scorer, template keyword candidates, the text-generation
//! trait with the suggestion engine built on it, and the content store
//! abstraction.
//!
//! This crate contains no tokio, reqwest, filesystem I/O, or other
//! native-only dependencies.
//!
//! ```rust
//! use onpage_core::{score, ContentSnapshot, Status};
//!
//! let snapshot = ContentSnapshot::new("post-1", "Red Running Shoes", "<h1>Red running shoes</h1>")
//!     .with_url("https://shop.test/red-running-shoes");
//! let result = score(&snapshot, "running shoes").unwrap();
//! assert!(result.score > 0);
//! assert_eq!(result.status, Status::from_score(result.score));
//! ```

pub mod error;
pub mod generation;
pub mod keywords;
pub mod markup;
pub mod models;
pub mod score;
pub mod state;
pub mod store;

pub use error::{Result, SeoError};
pub use generation::{generate_rewrite_suggestions, suggest_keywords, TemplateGenerator, TextGenerator};
pub use keywords::{generate_keyword_candidates, KeywordTemplates};
pub use models::{
    AnalysisResult, ContentSnapshot, FocusKeyword, KeywordCandidate, RewriteSuggestions, Signal,
    Status, Tier,
};
pub use score::score;

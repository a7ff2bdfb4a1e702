//! # Onpage
//!
//! On-page SEO scoring and suggestions for a piece of content against a
//! single focus keyword.
//!
//! The scoring and suggestion logic lives in [`onpage_core`]; this crate adds
//! what a host needs around it: TOML configuration, HTTP text-generation
//! providers, metadata override resolution, store workflows, and the
//! `onpage` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ Content file │──▶│   Resolver   │──▶│     Scorer       │──▶ score/status/signals
//! │ / host store │   │ (overrides)  │   │  (onpage-core)   │
//! └──────────────┘   └──────┬───────┘   └──────────────────┘
//!                           │
//!                           ▼
//!                   ┌──────────────────┐   ┌──────────────────────┐
//!                   │ Suggestion engine│──▶│ TextGenerator         │
//!                   │  (onpage-core)   │   │ openai/ollama/template│
//!                   └──────────────────┘   └──────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! onpage score post.json --keyword "running shoes"
//! onpage keywords post.json
//! onpage rewrite post.json --keyword "running shoes"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`generation`] | Text-generation providers |
//! | [`resolve`] | Metadata override resolution and content file loading |
//! | [`workflow`] | Store-backed analyze / suggest / apply helpers |
//! | [`score_cmd`] | `onpage score` |
//! | [`suggest_cmd`] | `onpage keywords`, `onpage rewrite` |

pub mod config;
pub mod generation;
pub mod resolve;
pub mod score_cmd;
pub mod suggest_cmd;
pub mod workflow;

//! Analyzers combine char filters, a tokenizer and token filters.
//!
//! - [`analyzer::Analyzer`] - the core trait
//! - [`pipeline::PipelineAnalyzer`] - configurable chain of stages
//! - [`normalizer::TextNormalizer`] - the fixed, option-driven chain used for support messages

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod normalizer;
pub mod pipeline;

//! # Message Categorizer
//!
//! Classifies short free-text support messages into a fixed set of categories.
//!
//! ## Features
//!
//! - Deterministic text normalization pipeline (char filters, tokenizer, token filters)
//! - TF-IDF vectorization with a bounded vocabulary
//! - One-vs-rest linear SVM with balanced class weighting
//! - Versioned, checksummed artifacts for the fitted vectorizer and classifier
//!
//! ## Example
//!
//! ```no_run
//! use message_categorizer::ml::{MessageCategorizer, RawRecord, TrainingConfig};
//!
//! # fn main() -> message_categorizer::error::Result<()> {
//! let records = vec![
//!     RawRecord::new("Where is my parcel?", "delivery"),
//!     RawRecord::new("I was charged twice", "payment"),
//!     RawRecord::new("Can I change my username?", "general"),
//! ];
//!
//! let (categorizer, report) = MessageCategorizer::train(records, &TrainingConfig::default())?;
//! println!("{}", report.test);
//!
//! let category = categorizer.predict("my package never arrived")?;
//! println!("{category}");
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod error;
pub mod ml;
pub mod storage;

pub mod prelude {
    pub use crate::analysis::analyzer::normalizer::{
        LinguisticResources, NormalizationOption, NormalizationOptions, TextNormalizer,
    };
    pub use crate::error::{CategorizerError, Result};
    pub use crate::ml::{
        Category, ClassWeight, FeatureVector, LinearSvc, LinearSvcConfig, MessageCategorizer,
        TfIdfConfig, TfIdfVectorizer, TrainingConfig,
    };
    pub use crate::storage::{ArtifactStore, FileArtifactStore, MemoryArtifactStore};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

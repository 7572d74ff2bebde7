//! Hadith Graph Core - types and algorithms for the hadith knowledge-graph pipeline
//!
//! This crate provides the building blocks for turning bilingual hadith
//! corpora into a typed knowledge graph:
//! - Text normalization for Arabic and English (`text`)
//! - BIO tag-span resolution and the tagger trait seam (`tags`)
//! - Bilingual dictionary matching and lexicon lookup (`dictionary`)
//! - Per-collection mention aggregation (`annotate`)
//! - Similarity tiering over precomputed matrices (`similarity`)
//! - Turtle statement emission (`turtle`)

#![warn(missing_docs)]

pub mod annotate;
pub mod category;
pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod error;
pub mod numerals;
pub mod similarity;
pub mod tags;
pub mod text;
pub mod turtle;
pub mod verses;

pub use error::Error;
pub use error::Result;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::annotate::Annotator;
    pub use crate::annotate::MentionRow;
    pub use crate::annotate::MentionTable;
    pub use crate::category::CategoryKind;
    pub use crate::category::CategorySpec;
    pub use crate::category::Predicate;
    pub use crate::config::PipelineConfig;
    pub use crate::corpus::Collection;
    pub use crate::corpus::Corpus;
    pub use crate::corpus::Document;
    pub use crate::dictionary::Dictionary;
    pub use crate::dictionary::Lexicon;
    pub use crate::dictionary::MatchPolicy;
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::similarity::SimilarityMatrix;
    pub use crate::similarity::SimilarityTable;
    pub use crate::similarity::Tier;
    pub use crate::tags::EntityTagger;
    pub use crate::tags::TaggedToken;
    pub use crate::text::Lang;
    pub use crate::turtle::CategoryTable;
    pub use crate::turtle::TurtleExporter;
}

// Public modules
pub mod analyzer;
pub mod anomaly;
pub mod api;
pub mod config;
pub mod influence;
pub mod lexicon;
pub mod sentiment;
pub mod trending;
pub mod types;
pub mod validator;

// Re-exports
pub use analyzer::analyze_feed;
pub use types::{
    AnalysisFlags, AnomalyType, FeedAnalysis, InfluenceEntry, ParsedMessage,
    SentimentDistribution, SentimentLabel,
};

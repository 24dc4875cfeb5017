//! AI-powered YouTube video analysis with search grounding.

pub mod analysis;
pub mod config;
pub mod db;
pub mod history;
pub mod output;
pub mod youtube;

pub use analysis::{Analysis, AnalysisClient, AnalysisError};
pub use history::{HistoryEntry, HistoryStore, NewHistoryEntry, StateStore};

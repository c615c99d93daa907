//! Spot search
//!
//! This module handles:
//! - Key-term extraction and multi-strategy query planning
//! - The nearby place search client
//! - Merging and deduplicating multi-query result sets
//! - Relevance scoring and filtering

pub mod aggregate;
pub mod client;
pub mod relevance;
pub mod terms;

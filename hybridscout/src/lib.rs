pub mod config;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod results;
pub mod search;

pub use config::{ChunkOverlap, EncodingMode, SearchConfig};
pub use errors::{validate_tolerance, SearchError, SearchResult};
pub use results::{ChunkResult, FileResult, Match, MatchKind, MatchSet, SearchResult as SearchOutput};
pub use search::{edit_distance, hybrid_search, hybrid_search_str, ApproximateStrategy, HybridMatcher};

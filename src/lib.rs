pub mod aggregate;
pub mod aggregator;
pub mod board;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod rank;
pub mod retry;
pub mod time;

pub use aggregate::AggregatedContributor;
pub use aggregator::ContributorAggregator;
pub use board::{Board, BoardFormat};
pub use config::Config;
pub use rank::{progress_percentage, rank_badge, rank_class};

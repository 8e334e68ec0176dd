pub mod config;
pub mod engine;
pub mod fixture_row;
pub mod fixtures_csv;
pub mod fixtures_fetch;
pub mod heatmap;
pub mod http_client;
pub mod markets;
pub mod odds;
pub mod report;
pub mod scoreline;

pub use engine::{MarketResult, calculate_markets};
pub use fixture_row::FixtureRow;

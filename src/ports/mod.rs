//! Port traits implemented by adapters.

pub mod cache_port;
pub mod config_port;
pub mod price_port;
pub mod report_port;

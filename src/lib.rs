pub mod config;
pub mod diff;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod stats;

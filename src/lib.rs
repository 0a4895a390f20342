pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod lode;
pub mod output;
pub mod rewrite;

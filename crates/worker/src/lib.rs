//! Command-line worker that runs generation batches, group shuffles and
//! metadata exports against the production database and blob store.

pub mod cli;
pub mod commands;
pub mod config;

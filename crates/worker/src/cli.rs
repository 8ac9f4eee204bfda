use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nftgen_core::generation::GenerationJob;
use nftgen_core::types::{parse_optional_id, DbId};

/// nftgen worker - generate, shuffle and export collection items
#[derive(Debug, Parser)]
#[command(name = "nftgen-worker")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// An id argument where `-1` (or an empty value) means "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalId(pub Option<DbId>);

fn parse_optional_id_arg(raw: &str) -> Result<OptionalId, String> {
    parse_optional_id(raw)
        .map(OptionalId)
        .map_err(|e| e.to_string())
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(long)]
    pub project_id: DbId,

    #[arg(long)]
    pub collection_id: DbId,

    #[arg(long)]
    pub composite_group_id: DbId,

    /// Trait set to generate for; -1 for none
    #[arg(long, default_value = "-1", allow_hyphen_values = true, value_parser = parse_optional_id_arg)]
    pub trait_set_id: OptionalId,

    /// First item index of the batch
    #[arg(long, default_value_t = 0)]
    pub start_index: i32,

    /// Number of items to attempt
    #[arg(long, default_value_t = 100)]
    pub batch_size: i32,

    /// Pre-download every layer before generating
    #[arg(long)]
    pub first_batch: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate one batch of items into a composite group
    Generate(GenerateArgs),

    /// Persist a random display order for a composite group
    Shuffle {
        #[arg(long)]
        project_id: DbId,

        #[arg(long)]
        collection_id: DbId,

        #[arg(long)]
        composite_group_id: DbId,
    },

    /// Write one metadata JSON document per item of a composite group
    ExportMetadata {
        #[arg(long)]
        project_id: DbId,

        #[arg(long)]
        collection_id: DbId,

        #[arg(long)]
        composite_group_id: DbId,

        /// Trait set whose traits name the attributes; -1 for none
        #[arg(long, default_value = "-1", allow_hyphen_values = true, value_parser = parse_optional_id_arg)]
        trait_set_id: OptionalId,

        /// Directory receiving `<index>.json` files
        #[arg(long)]
        out_dir: PathBuf,
    },

    /// Apply pending database migrations
    Migrate,
}

impl GenerateArgs {
    /// The generation job these arguments describe.
    pub fn job(&self) -> GenerationJob {
        GenerationJob {
            project_id: self.project_id,
            collection_id: self.collection_id,
            composite_group_id: self.composite_group_id,
            trait_set_id: self.trait_set_id.0,
            start_index: self.start_index,
            batch_size: self.batch_size,
            first_batch_for_trait_set: self.first_batch,
        }
    }
}

use clap::Subcommand;

use crate::cli::root_commands::FieldArgs;

/// Draft commands. Only the author may touch a draft.
#[derive(Clone, Debug, Subcommand)]
pub enum DraftCommands {
    /// Create a draft.
    Create {
        #[arg(long)]
        author: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Patch a draft.
    Update {
        id: String,
        #[arg(long)]
        author: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
}

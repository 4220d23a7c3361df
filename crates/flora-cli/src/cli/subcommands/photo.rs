use clap::Subcommand;

/// Photo commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PhotoCommands {
    /// Attach a pending photo to a record.
    Attach {
        id: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        by: String,
    },
    /// List photos of a record.
    List { id: String },
}

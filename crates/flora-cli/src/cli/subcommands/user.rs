use clap::Subcommand;
use flora_core::enums::UserRole;

use crate::cli::values::enum_arg;

/// Roster commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Register a user or update an existing one.
    Add {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value = "contributor", value_parser = enum_arg::<UserRole>)]
        role: UserRole,
    },
    /// Get a user by ID.
    Get { id: String },
    /// List reviewers and admins.
    Reviewers,
}

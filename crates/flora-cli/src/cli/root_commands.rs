use clap::{Args, Subcommand};
use flora_core::enums::{ActivityAction, ReviewDecision, SpeciesStatus};

use crate::cli::subcommands::{DraftCommands, PhotoCommands, UserCommands};
use crate::cli::values::enum_arg;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Reviewer roster.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Author drafts.
    Draft {
        #[command(subcommand)]
        action: DraftCommands,
    },
    /// Submit a draft for review.
    Submit(AuthorArgs),
    /// Cast or replace a review vote.
    Vote(VoteArgs),
    /// Edit a record under review.
    Edit(EditArgs),
    /// Resubmit a rejected record.
    Resubmit(AuthorArgs),
    /// Ask for a revision of a published record.
    RequestRevision(RevisionArgs),
    /// Show one record.
    Show { id: String },
    /// Field change history of a record.
    History { id: String },
    /// Review status and live votes of a record.
    Reviews { id: String },
    /// Activity log, for one record or filtered across the catalog.
    Activity(ActivityArgs),
    /// List records.
    List {
        #[arg(long, value_parser = enum_arg::<SpeciesStatus>)]
        status: Option<SpeciesStatus>,
        #[arg(long)]
        author: Option<String>,
    },
    /// Photos.
    Photo {
        #[command(subcommand)]
        action: PhotoCommands,
    },
    /// Print the effective configuration as TOML.
    Config,
}

/// Field values given as repeated `--field key=value` and/or one `--json` object.
///
/// Values that parse as JSON are taken as JSON; anything else is a string.
#[derive(Clone, Debug, Default, Args)]
pub struct FieldArgs {
    #[arg(long)]
    pub field: Vec<String>,
    #[arg(long)]
    pub json: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthorArgs {
    pub id: String,
    #[arg(long)]
    pub author: String,
}

#[derive(Clone, Debug, Args)]
pub struct VoteArgs {
    pub id: String,
    #[arg(long)]
    pub reviewer: String,
    #[arg(long, value_parser = enum_arg::<ReviewDecision>)]
    pub decision: ReviewDecision,
    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub reviewer: String,
    #[arg(long)]
    pub reason: String,
    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Clone, Debug, Args)]
pub struct RevisionArgs {
    pub id: String,
    #[arg(long)]
    pub requester: String,
    #[arg(long)]
    pub reason: String,
}

#[derive(Clone, Debug, Args)]
pub struct ActivityArgs {
    pub id: Option<String>,
    #[arg(long)]
    pub actor: Option<String>,
    #[arg(long, value_parser = enum_arg::<ActivityAction>)]
    pub action: Option<ActivityAction>,
}

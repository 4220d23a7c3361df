use flora_core::entities::{ActivityEntry, ChangeEntry, Species};
use flora_core::enums::SpeciesStatus;
use flora_db::repos::activity::ActivityFilter;
use flora_db::repos::species::SpeciesFilter;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ActivityArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct HistoryResponse {
    species_id: String,
    changes: Vec<ChangeEntry>,
}

#[derive(Debug, Serialize)]
struct ActivityResponse {
    entries: Vec<ActivityEntry>,
}

#[derive(Debug, Serialize)]
struct SpeciesListResponse {
    species: Vec<Species>,
}

/// Handle `flora show`.
pub async fn show(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.service.get_species(id).await?, flags.format)
}

/// Handle `flora history`.
pub async fn history(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let changes = ctx.service.get_change_history(id).await?;
    output(
        &HistoryResponse {
            species_id: id.to_string(),
            changes,
        },
        flags.format,
    )
}

/// Handle `flora reviews`.
pub async fn reviews(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.service.get_review_status(id).await?, flags.format)
}

/// Handle `flora activity`.
///
/// With only an ID this is the record's full log, oldest first. Any filter
/// switches to a catalog-wide query, newest first.
pub async fn activity(args: &ActivityArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entries = match (&args.id, &args.actor, args.action) {
        (Some(id), None, None) if flags.limit.is_none() => ctx.service.get_activity(id).await?,
        _ => {
            let filter = ActivityFilter {
                species_id: args.id.clone(),
                actor_id: args.actor.clone(),
                action: args.action,
                limit: Some(effective_limit(flags.limit, ctx.config.general.default_limit)),
            };
            ctx.service.query_activity(&filter).await?
        }
    };
    output(&ActivityResponse { entries }, flags.format)
}

/// Handle `flora list`.
pub async fn list(
    status: Option<SpeciesStatus>,
    author: Option<String>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filter = SpeciesFilter {
        status,
        created_by: author,
        limit: Some(effective_limit(flags.limit, ctx.config.general.default_limit)),
    };
    let species = ctx.service.list_species(&filter).await?;
    output(&SpeciesListResponse { species }, flags.format)
}

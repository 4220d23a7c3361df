use crate::cli::GlobalFlags;
use crate::cli::root_commands::{AuthorArgs, EditArgs, RevisionArgs, VoteArgs};
use crate::commands::shared::fields::parse_fields;
use crate::context::AppContext;
use crate::output::output;

/// Handle `flora submit`.
pub async fn submit(args: &AuthorArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let species = ctx.service.submit(&args.id, &args.author).await?;
    output(&species, flags.format)
}

/// Handle `flora vote`. Prints the vote followed by the resulting review status.
pub async fn vote(args: &VoteArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entry = ctx
        .service
        .cast_vote(&args.id, &args.reviewer, args.decision, args.comment.as_deref())
        .await?;
    let status = ctx.service.get_review_status(&args.id).await?;
    output(
        &serde_json::json!({
            "vote": entry,
            "review": status,
        }),
        flags.format,
    )
}

/// Handle `flora edit`.
pub async fn edit(args: &EditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let fields = parse_fields(&args.fields)?;
    let species = ctx
        .service
        .reviewer_edit(&args.id, &args.reviewer, &fields, &args.reason)
        .await?;
    output(&species, flags.format)
}

/// Handle `flora resubmit`.
pub async fn resubmit(args: &AuthorArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let species = ctx.service.resubmit(&args.id, &args.author).await?;
    output(&species, flags.format)
}

/// Handle `flora request-revision`.
pub async fn request_revision(
    args: &RevisionArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let species = ctx
        .service
        .request_revision(&args.id, &args.requester, &args.reason)
        .await?;
    output(&species, flags.format)
}

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DraftCommands;
use crate::commands::shared::fields::parse_fields;
use crate::context::AppContext;
use crate::output::output;

/// Handle `flora draft`.
pub async fn handle(action: &DraftCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        DraftCommands::Create { author, fields } => {
            let fields = parse_fields(fields)?;
            let species = ctx.service.create_draft(author, &fields).await?;
            output(&species, flags.format)
        }
        DraftCommands::Update { id, author, fields } => {
            let fields = parse_fields(fields)?;
            let species = ctx.service.update_draft(id, author, &fields).await?;
            output(&species, flags.format)
        }
    }
}

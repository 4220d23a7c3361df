use flora_core::entities::User;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ReviewerListResponse {
    reviewers: Vec<User>,
}

/// Handle `flora user`.
pub async fn handle(action: &UserCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        UserCommands::Add {
            id,
            name,
            email,
            role,
        } => {
            let user = ctx
                .service
                .register_user(id, name, email.as_deref(), *role)
                .await?;
            output(&user, flags.format)
        }
        UserCommands::Get { id } => output(&ctx.service.get_user(id).await?, flags.format),
        UserCommands::Reviewers => {
            let reviewers = ctx.service.list_reviewers().await?;
            output(&ReviewerListResponse { reviewers }, flags.format)
        }
    }
}

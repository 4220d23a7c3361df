use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::Draft { action } => commands::draft::handle(&action, ctx, flags).await,
        Commands::Submit(args) => commands::review::submit(&args, ctx, flags).await,
        Commands::Vote(args) => commands::review::vote(&args, ctx, flags).await,
        Commands::Edit(args) => commands::review::edit(&args, ctx, flags).await,
        Commands::Resubmit(args) => commands::review::resubmit(&args, ctx, flags).await,
        Commands::RequestRevision(args) => {
            commands::review::request_revision(&args, ctx, flags).await
        }
        Commands::Show { id } => commands::inspect::show(&id, ctx, flags).await,
        Commands::History { id } => commands::inspect::history(&id, ctx, flags).await,
        Commands::Reviews { id } => commands::inspect::reviews(&id, ctx, flags).await,
        Commands::Activity(args) => commands::inspect::activity(&args, ctx, flags).await,
        Commands::List { status, author } => {
            commands::inspect::list(status, author, ctx, flags).await
        }
        Commands::Photo { action } => commands::photo::handle(&action, ctx, flags).await,
        Commands::Config => commands::config::handle(&ctx.config),
    }
}

use flora_core::entities::Photo;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PhotoCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct PhotoListResponse {
    species_id: String,
    photos: Vec<Photo>,
}

/// Handle `flora photo`.
pub async fn handle(action: &PhotoCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        PhotoCommands::Attach { id, url, by } => {
            output(&ctx.service.attach_photo(id, url, by).await?, flags.format)
        }
        PhotoCommands::List { id } => {
            let photos = ctx.service.list_photos(id).await?;
            output(
                &PhotoListResponse {
                    species_id: id.clone(),
                    photos,
                },
                flags.format,
            )
        }
    }
}

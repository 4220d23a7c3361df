use anyhow::Context;
use flora_config::FloraConfig;
use flora_db::service::CatalogService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: CatalogService,
    pub config: FloraConfig,
}

impl AppContext {
    /// Open the catalog, letting `--db` win over `database.path`.
    pub async fn init(mut config: FloraConfig, db_override: Option<&str>) -> anyhow::Result<Self> {
        if let Some(path) = db_override {
            config.database.path = path.to_string();
        }
        if config.database.is_in_memory() {
            tracing::warn!("using an in-memory database; nothing will be kept after exit");
        }

        let service = CatalogService::from_config(&config)
            .await
            .with_context(|| format!("failed to open catalog at {}", config.database.path))?;
        Ok(Self { service, config })
    }
}

use flora_config::FloraConfig;

/// Handle `flora config`: print the merged configuration.
pub fn handle(config: &FloraConfig) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(config)?;
    print!("{rendered}");
    Ok(())
}

use config::load_config;
use config::shared::DrainHookConfig;

/// Loads the [`DrainHookConfig`] and validates it.
pub fn load_drain_hook_config() -> anyhow::Result<DrainHookConfig> {
    let config = load_config::<DrainHookConfig>()?;
    config.validate()?;

    Ok(config)
}

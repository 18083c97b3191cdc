use anyhow::Result;

use crate::config::{ConfigFormat, ReneConfig};

/// Display the merged configuration
pub fn execute(config: &ReneConfig, format: ConfigFormat) -> Result<()> {
    tracing::info!("Showing merged configuration as {format:?}");
    let output = config.export_config(format)?;
    println!("{}", output.trim_end());
    Ok(())
}

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::EXAMPLE_CONFIG;

/// Write the example configuration file
pub fn init(output_path: PathBuf, force: bool) -> Result<()> {
    if output_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists: {}\nUse --force to overwrite",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    std::fs::write(&output_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file: {}", output_path.display()))?;

    println!("✓ Created configuration file: {}", output_path.display());
    println!("\nEdit the secret and the timetables, then start the lock:");
    println!("  smartboard-lock run");

    Ok(())
}

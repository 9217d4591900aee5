//! Initialize command.

use std::path::Path;

use console::style;

use crate::config::{starter_toml, DEFAULT_CONFIG_FILE};

/// Write a starter config file into the working directory.
pub async fn cmd_init() -> anyhow::Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if path.exists() {
        println!(
            "{} {} already exists, leaving it untouched",
            style("!").yellow(),
            path.display()
        );
        return Ok(());
    }

    std::fs::write(path, starter_toml())?;
    println!(
        "{} Wrote starter config to {}",
        style("✓").green(),
        path.display()
    );
    println!("  Edit the [harvest] section, then run: cine harvest");
    Ok(())
}

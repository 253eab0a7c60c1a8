use crate::config::RecipesUrl;
use std::process::{Command, Stdio};

/// Hands the recipe browser URL to the desktop's default handler.
pub fn open_recipes(url: &RecipesUrl) -> anyhow::Result<()> {
    if url.is_empty() {
        anyhow::bail!("No recipe browser URL configured");
    }

    Command::new("xdg-open")
        .arg(url.as_str())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| anyhow::anyhow!("Failed to launch xdg-open for '{}': {}", url, e))?;
    Ok(())
}

//! repos command - List git repositories under a directory

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::store;

/// List the repositories directly under `root`.
pub fn repos(ctx: &Context, root: &Path, json: bool) -> Result<()> {
    let root = super::resolve_path(ctx, Some(root))?;
    let entries = store::list_repositories(&root)?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&entries).context("failed to serialize listing")?;
        println!("{}", rendered);
        return Ok(());
    }

    for entry in &entries {
        let marker = if entry.bare { " (bare)" } else { "" };
        println!("{}{}  {}", entry.name, marker, entry.path.display());
    }
    Ok(())
}

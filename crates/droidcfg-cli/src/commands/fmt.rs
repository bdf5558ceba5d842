//! Descriptor formatting.
//!
//! Formatting goes through the KDL document, so comments and nodes the
//! descriptor model does not know about are kept.

use anyhow::{Context, Result, bail};
use droidcfg_config::format_source;
use std::path::Path;
use tracing::info;

use super::fail;

pub fn fmt(path: &Path, write: bool, check: bool) -> Result<()> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let formatted = match format_source(&source) {
        Ok(text) => text,
        Err(e) => fail(&e),
    };

    if check {
        if formatted != source {
            bail!("{} is not in canonical form", path.display());
        }
        return Ok(());
    }

    if write {
        if formatted != source {
            std::fs::write(path, &formatted)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "Rewrote descriptor");
        }
    } else {
        print!("{}", formatted);
    }
    Ok(())
}

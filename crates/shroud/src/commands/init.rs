//! Create a starter shroud.toml.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::base_dir;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing shroud...");

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    let dir = base_dir(config_path);
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    let style_path = dir.join("plop-counter.css");
    if !style_path.exists() || yes {
        fs::write(&style_path, DEFAULT_STYLE).context("Failed to write plop-counter.css")?;
        tracing::info!("Created {}", style_path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'shroud generate' to write the JavaScript glue.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Shroud Configuration

[output]
# Output directory, relative to this file
dir = "dist"

# Name of the generated module
module = "shroud.js"

# Minify inlined CSS
minify = true

# Also write TypeScript declarations
typescript = true

# One table per custom element. The tag must contain a hyphen.
[[component]]
tag = "plop-counter"

# Attributes forwarded to the instance's attribute_changed
attributes = ["label"]

# Properties bridged to get_property / set_property
properties = [
    { name = "label", type = "string" },
    { name = "count", type = "number", readonly = true },
]

# Custom events dispatched on the host element
events = [{ name = "count-changed", detail = "number" }]

[component.style]
css = ["plop-counter.css"]
"#;

const DEFAULT_STYLE: &str = r#":host {
  display: inline-block;
}

button {
  font: inherit;
}
"#;

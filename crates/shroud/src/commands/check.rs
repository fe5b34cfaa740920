//! Validate the manifest and print a summary of each component.

use std::path::Path;

use anyhow::Result;
use shroud_glue::ComponentManifest;

use crate::config::load_config;

/// Run the check command.
pub async fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    if config.manifest.components.is_empty() {
        tracing::warn!("No components defined in {}", config_path.display());
        return Ok(());
    }

    for component in &config.manifest.components {
        println!("{}", summary(component));
    }

    tracing::info!("{} component(s) OK", config.manifest.components.len());
    Ok(())
}

fn summary(component: &ComponentManifest) -> String {
    let mut out = format!("<{}>", component.tag);

    if !component.attributes.is_empty() {
        out.push_str(&format!("\n  attributes: {}", component.attributes.join(", ")));
    }

    if !component.properties.is_empty() {
        let properties: Vec<String> = component
            .properties
            .iter()
            .map(|p| {
                let mode = if p.readonly { "ro" } else { "rw" };
                format!("{} ({})", p.name, mode)
            })
            .collect();
        out.push_str(&format!("\n  properties: {}", properties.join(", ")));
    }

    if !component.events.is_empty() {
        let events: Vec<&str> = component.events.iter().map(|e| e.name.as_str()).collect();
        out.push_str(&format!("\n  events: {}", events.join(", ")));
    }

    out
}

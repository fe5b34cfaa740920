//! Generate the JavaScript module and TypeScript declarations.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use shroud_glue::{GlueGenerator, GlueOptions};

use crate::config::{base_dir, load_config};

/// Command-line values that take precedence over `[output]`.
#[derive(Debug, Default)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub minify: Option<bool>,
    pub typescript: Option<bool>,
}

/// Files written by a generation run.
#[derive(Debug)]
pub struct Generated {
    pub module: PathBuf,
    pub typescript: Option<PathBuf>,
}

/// Run the generate command.
pub async fn run(config_path: &Path, overrides: Overrides) -> Result<Generated> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let base = base_dir(config_path);

    let output_dir = overrides
        .output
        .unwrap_or_else(|| base.join(&config.output.dir));
    let options = GlueOptions {
        base_dir: base,
        minify: overrides.minify.unwrap_or(config.output.minify),
    };
    let typescript = overrides.typescript.unwrap_or(config.output.typescript);

    tracing::info!("Generating glue for {} component(s)...", config.manifest.components.len());

    let generator = GlueGenerator::new();
    let module = generator
        .module(&config.manifest, &options)
        .context("Failed to generate module")?;

    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let module_path = output_dir.join(&config.output.module);
    tokio::fs::write(&module_path, module)
        .await
        .with_context(|| format!("Failed to write {}", module_path.display()))?;
    tracing::debug!("Wrote {}", module_path.display());

    let typescript_path = if typescript {
        let declarations = generator
            .typescript(&config.manifest)
            .context("Failed to generate TypeScript declarations")?;
        let path = module_path.with_extension("d.ts");
        tokio::fs::write(&path, declarations)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Wrote {}", path.display());
        Some(path)
    } else {
        None
    };

    tracing::info!(
        "Generated {} in {:?}",
        module_path.display(),
        start.elapsed()
    );

    Ok(Generated {
        module: module_path,
        typescript: typescript_path,
    })
}

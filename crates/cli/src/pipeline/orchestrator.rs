//! Pipeline orchestrator - coordinates all stages.
//!
//! Config -> catalogs -> synthesis -> pruning -> plugins -> dependencies ->
//! sketch text. Everything runs in memory; the sketch is written only by
//! [`Pipeline::write`], after every stage succeeded.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use codegen::CodeGenContext;
use config_loader::{discover_manifests, ConfigLoader};
use contracts::{
    Category, ContractError, IdIndex, ProjectConfig, ResolvedModule, DEFAULT_CONFIG_FILE,
    PROJECT_MARKER,
};
use observability::{
    record_dependencies, record_modules_resolved, record_plugin_run, record_ports,
    record_sketch_written, record_types_discovered, GenerationSummary,
};
use plugins::{PluginRegistry, PluginRunner};
use synthesis::{build_instance_index, build_type_index, prune, resolve_dependencies, DependencySet};
use tracing::{debug, info, instrument, warn};

use crate::cli::SketchOverrides;

/// Catalogs and resolved modules, before pruning
#[derive(Debug)]
pub struct Resolution {
    pub types_discovered: usize,
    pub types_configured: usize,
    pub modules: IdIndex<ResolvedModule>,
}

/// Result of a complete in-memory generation
#[derive(Debug)]
pub struct Generated {
    pub sketch: String,
    pub dependencies: DependencySet,
    pub summary: GenerationSummary,
}

/// Main pipeline orchestrator
#[derive(Debug)]
pub struct Pipeline {
    root: PathBuf,
    config: ProjectConfig,
    /// `None` when the default config file is absent and defaults are used
    config_path: Option<PathBuf>,
}

impl Pipeline {
    /// Check the project marker and load the project configuration.
    ///
    /// An explicit `config` must exist. Without one, `<root>/sketchgen.toml`
    /// is used when present and built-in defaults otherwise.
    #[instrument(name = "pipeline_load", skip_all, fields(root = %root.display()))]
    pub fn load(root: &Path, config: Option<&Path>) -> Result<Self> {
        if !root.join(PROJECT_MARKER).is_file() {
            return Err(ContractError::MissingProject {
                root: root.to_path_buf(),
                marker: PROJECT_MARKER.to_string(),
            }
            .into());
        }

        let (config, config_path) = match config {
            Some(path) => {
                let loaded = ConfigLoader::load_from_path(path).with_context(|| {
                    format!("Failed to load configuration from {}", path.display())
                })?;
                (loaded, Some(path.to_path_buf()))
            }
            None => {
                let default_path = root.join(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    let loaded = ConfigLoader::load_from_path(&default_path).with_context(|| {
                        format!("Failed to load configuration from {}", default_path.display())
                    })?;
                    (loaded, Some(default_path))
                } else {
                    warn!(
                        path = %default_path.display(),
                        "no project configuration found, using defaults"
                    );
                    (ProjectConfig::default(), None)
                }
            }
        };

        debug!(
            module_types = config.module_types.len(),
            modules = config.modules.len(),
            "configuration loaded"
        );

        Ok(Self {
            root: root.to_path_buf(),
            config,
            config_path,
        })
    }

    /// Replace configured settings with command-line values, then revalidate
    pub fn apply_overrides(&mut self, overrides: &SketchOverrides) -> Result<()> {
        let sketch = &mut self.config.sketch;
        if !overrides.categories.is_empty() {
            sketch.categories = overrides
                .categories
                .iter()
                .map(|c| Category::new(c.as_str()))
                .collect();
        }
        if !overrides.plugins.is_empty() {
            sketch.plugins = overrides.plugins.clone();
        }
        if let Some(secs) = overrides.status_interval {
            sketch.status_update_interval_secs = secs;
        }

        ConfigLoader::validate(&self.config).context("Invalid command-line override")?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn output_path(&self) -> PathBuf {
        self.config.sketch.output_path(&self.root)
    }

    /// Build both catalogs and resolve every module instance
    #[instrument(name = "pipeline_resolve", skip_all)]
    pub fn resolve(&self) -> Result<Resolution> {
        let library_dir = self.config.sketch.library_path(&self.root);
        let discovered = discover_manifests(&library_dir)?;
        let types_discovered = discovered.len();
        let types_configured = self.config.module_types.len();

        let types = build_type_index(discovered, self.config.module_types.clone())?;
        let instances = build_instance_index(self.config.modules.clone())?;
        let modules = synthesis::synthesize(&types, &instances)?;

        record_types_discovered(types_discovered, types_configured);
        record_modules_resolved(modules.len());

        Ok(Resolution {
            types_discovered,
            types_configured,
            modules,
        })
    }

    /// Filter ports to the enabled categories
    pub fn prune(&self, resolution: &Resolution) -> IdIndex<ResolvedModule> {
        prune(&resolution.modules, &self.config.sketch.categories)
    }

    /// Run every stage up to the sketch text. Nothing is written.
    #[instrument(
        name = "pipeline_generate",
        skip_all,
        fields(root = %self.root.display(), plugins = self.config.sketch.plugins.len())
    )]
    pub fn generate(&self) -> Result<Generated> {
        let mut summary = GenerationSummary::new();

        let started = Instant::now();
        let resolution = self.resolve()?;
        summary.stage("synthesize", started.elapsed());
        summary.types_discovered = resolution.types_discovered;
        summary.types_configured = resolution.types_configured;
        summary.modules = resolution.modules.len();

        let started = Instant::now();
        let pruned = self.prune(&resolution);
        summary.stage("prune", started.elapsed());
        summary.ports_declared = count_ports(&resolution.modules);
        summary.ports_exposed = count_ports(&pruned);
        record_ports(summary.ports_declared, summary.ports_exposed);

        if pruned.is_empty() {
            warn!("no modules configured, the sketch will only contain the scaffold");
        }
        for module in pruned.iter().filter(|m| !m.has_ports()) {
            warn!(module = %module.id, "module has no exposed inputs or outputs");
            summary.modules_without_ports.push(module.id.to_string());
        }

        let started = Instant::now();
        let registry = PluginRegistry::with_builtins()?;
        let fragments = PluginRunner::new(&registry).run_with(
            &self.config.sketch.plugins,
            pruned.as_slice(),
            |name, elapsed| record_plugin_run(name, elapsed.as_secs_f64() * 1000.0),
        )?;
        summary.stage("plugins", started.elapsed());
        summary.plugins = self.config.sketch.plugins.clone();

        let mut dependencies = resolve_dependencies(resolution.modules.iter());
        dependencies.extend_from_fragments(&fragments);
        record_dependencies(dependencies.len());
        summary.dependencies = dependencies.iter().cloned().collect();

        let started = Instant::now();
        let context = CodeGenContext::new(
            pruned.into_vec(),
            fragments,
            self.config.sketch.status_interval()?,
            self.config.sketch.baud_rate,
        );
        let sketch = codegen::generate(&context)?;
        summary.stage("generate", started.elapsed());
        summary.sketch_bytes = sketch.len();

        info!(
            modules = summary.modules,
            dependencies = dependencies.len(),
            bytes = sketch.len(),
            "sketch generated"
        );

        Ok(Generated {
            sketch,
            dependencies,
            summary,
        })
    }

    /// Atomically replace the sketch file with `generated`
    pub fn write(&self, generated: &Generated) -> Result<PathBuf> {
        let path = self.output_path();
        codegen::write_sketch(&path, &generated.sketch)?;
        record_sketch_written(generated.sketch.len());
        info!(path = %path.display(), "sketch written");
        Ok(path)
    }
}

fn count_ports(modules: &IdIndex<ResolvedModule>) -> usize {
    modules
        .iter()
        .map(|m| m.inputs.len() + m.outputs.len())
        .sum()
}

//! Pipeline metrics
//!
//! Thin wrappers over the `metrics` facade so metric names live in one
//! place. Without an installed recorder every call is a no-op.

use std::fmt;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use serde::Serialize;

/// Module types found in the library directory and in the project config
pub fn record_types_discovered(discovered: usize, configured: usize) {
    gauge!("sketchgen_module_types", "source" => "library").set(discovered as f64);
    gauge!("sketchgen_module_types", "source" => "config").set(configured as f64);
}

pub fn record_modules_resolved(count: usize) {
    gauge!("sketchgen_modules_resolved").set(count as f64);
}

/// Port counts before and after category pruning
pub fn record_ports(before: usize, after: usize) {
    gauge!("sketchgen_ports_declared").set(before as f64);
    gauge!("sketchgen_ports_exposed").set(after as f64);
}

pub fn record_plugin_run(plugin: &str, elapsed_ms: f64) {
    counter!("sketchgen_plugins_run_total", "plugin" => plugin.to_string()).increment(1);
    histogram!("sketchgen_plugin_render_ms", "plugin" => plugin.to_string()).record(elapsed_ms);
}

pub fn record_dependencies(count: usize) {
    gauge!("sketchgen_dependencies").set(count as f64);
}

pub fn record_sketch_written(bytes: usize) {
    counter!("sketchgen_sketches_written_total").increment(1);
    gauge!("sketchgen_sketch_bytes").set(bytes as f64);
}

/// Wall time of one pipeline stage
pub fn record_stage_duration(stage: &'static str, elapsed_ms: f64) {
    histogram!("sketchgen_stage_duration_ms", "stage" => stage).record(elapsed_ms);
}

pub fn record_build(target: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "sketchgen_builds_total",
        "target" => target.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Timing of one pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageTiming {
    pub stage: &'static str,
    pub elapsed_ms: f64,
}

/// Per-run numbers for the end-of-run summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub types_discovered: usize,
    pub types_configured: usize,
    pub modules: usize,
    /// Modules whose ports were all filtered out
    pub modules_without_ports: Vec<String>,
    pub ports_declared: usize,
    pub ports_exposed: usize,
    pub plugins: Vec<String>,
    pub dependencies: Vec<String>,
    pub sketch_bytes: usize,
    pub stages: Vec<StageTiming>,
}

impl GenerationSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stage both here and in the metrics recorder
    pub fn stage(&mut self, stage: &'static str, elapsed: Duration) {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        record_stage_duration(stage, elapsed_ms);
        self.stages.push(StageTiming { stage, elapsed_ms });
    }

    pub fn ports_pruned(&self) -> usize {
        self.ports_declared.saturating_sub(self.ports_exposed)
    }

    pub fn total_ms(&self) -> f64 {
        self.stages.iter().map(|s| s.elapsed_ms).sum()
    }
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Generation Summary ===")?;
        writeln!(
            f,
            "Module types: {} ({} from library, {} from config)",
            self.types_discovered + self.types_configured,
            self.types_discovered,
            self.types_configured
        )?;
        writeln!(f, "Modules: {}", self.modules)?;
        writeln!(
            f,
            "Ports exposed: {} of {} ({} pruned)",
            self.ports_exposed,
            self.ports_declared,
            self.ports_pruned()
        )?;
        if !self.modules_without_ports.is_empty() {
            writeln!(
                f,
                "Modules with no exposed I/O: {}",
                self.modules_without_ports.join(", ")
            )?;
        }
        if self.plugins.is_empty() {
            writeln!(f, "Plugins: none")?;
        } else {
            writeln!(f, "Plugins: {}", self.plugins.join(", "))?;
        }
        writeln!(f, "Dependencies: {}", self.dependencies.len())?;
        for library in &self.dependencies {
            writeln!(f, "  - {library}")?;
        }
        writeln!(f, "Sketch size: {} bytes", self.sketch_bytes)?;
        write!(f, "Total time: {:.2} ms", self.total_ms())
    }
}

//! The generation run.
//!
//! A run has two phases. [`Generator::plan`] locates, analyses, maps and
//! renders every component in memory; any failure there leaves the output tree
//! untouched. [`Generator::write`] then copies the runtime files once, writes
//! each component's sources and schedules its bundle on a background task.
//! Every scheduled bundle is awaited before the run returns, whether or not an
//! earlier write failed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info};
use vrgen_common::GeneratorConfig;

use crate::analyzer;
use crate::emit::bundler::{Bundler, bundler_for};
use crate::emit::layout::OutputLayout;
use crate::emit::templates::Templates;
use crate::emit::{Emitter, RenderedComponent, RenderedFile};
use crate::error::{Error, Result};
use crate::locator::locate;
use crate::view_model::ComponentViewModel;

/// Extract a component file and build its view model.
pub fn build_view_model(path: &Path, package: &str) -> Result<ComponentViewModel> {
    let descriptor = analyzer::extract(path)?;
    ComponentViewModel::build(&descriptor, path, package)
}

/// Everything a run would write, rendered in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub runtime: Vec<RenderedFile>,
    pub components: Vec<RenderedComponent>,
}

impl GenerationPlan {
    /// Runtime files first, then each component's rendered files.
    pub fn files(&self) -> impl Iterator<Item = &RenderedFile> {
        self.runtime.iter().chain(
            self.components
                .iter()
                .flat_map(|component| component.files()),
        )
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Component names, in processing order
    pub components: Vec<String>,
    /// Rendered files written, runtime files included
    pub files_written: usize,
    pub bundles_written: usize,
    pub bundled_bytes: u64,
}

/// Drives a run for one configuration.
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    emitter: Emitter,
    bundler: Arc<dyn Bundler>,
}

impl Generator {
    /// Create a generator using the bundler named in `config`.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let bundler: Arc<dyn Bundler> = Arc::from(bundler_for(config.bundler)?);
        Self::with_bundler(config, bundler)
    }

    pub fn with_bundler(config: GeneratorConfig, bundler: Arc<dyn Bundler>) -> Result<Self> {
        let templates = Templates::load(config.templates.as_deref())?;
        let layout = OutputLayout::new(&config.output_dir, &config.package);
        Ok(Self {
            config,
            emitter: Emitter::new(layout, templates),
            bundler,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn layout(&self) -> &OutputLayout {
        self.emitter.layout()
    }

    /// Phase one: render every component without touching the output tree.
    pub fn plan(&self) -> Result<GenerationPlan> {
        let files = locate(&self.config.components, &self.config.extensions)?;
        info!(count = files.len(), "Discovered component files.");

        let mut components = Vec::with_capacity(files.len());
        let mut sources: HashMap<String, &Path> = HashMap::with_capacity(files.len());
        for path in &files {
            let view_model = build_view_model(path, &self.config.package)?;
            // every component owns its class and connector file names
            if let Some(first) = sources.insert(view_model.component_name.clone(), path) {
                return Err(Error::DuplicateComponent {
                    name: view_model.component_name,
                    first: first.to_path_buf(),
                    second: path.clone(),
                });
            }
            debug!(
                component = %view_model.component_name,
                props = view_model.all_props.len(),
                required = view_model.required_props.len(),
                "Built view model."
            );
            components.push(self.emitter.render(&view_model, path)?);
        }

        Ok(GenerationPlan {
            runtime: self.emitter.runtime_files(),
            components,
        })
    }

    /// Run both phases.
    pub async fn run(&self) -> Result<GenerationReport> {
        let plan = self.plan()?;
        self.write(&plan).await
    }

    /// Phase two: write a plan to disk and bundle every connector.
    pub async fn write(&self, plan: &GenerationPlan) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();
        let mut bundles: JoinSet<(PathBuf, Result<u64>)> = JoinSet::new();

        let mut outcome = self.write_files(plan, &mut report, &mut bundles);

        while let Some(joined) = bundles.join_next().await {
            let result = match joined {
                Ok((dest, Ok(bytes))) => {
                    debug!(dest = %dest.display(), bytes, "Bundle completed.");
                    report.bundles_written += 1;
                    report.bundled_bytes += bytes;
                    continue;
                }
                Ok((_, Err(err))) => err,
                Err(err) => Error::Bundle {
                    path: self.layout().resources_dir().to_path_buf(),
                    message: format!("bundle task failed: {err}"),
                },
            };
            if outcome.is_ok() {
                outcome = Err(result);
            }
        }
        outcome?;

        info!(
            components = report.components.len(),
            files = report.files_written,
            bundles = report.bundles_written,
            "Generation finished."
        );
        Ok(report)
    }

    fn write_files(
        &self,
        plan: &GenerationPlan,
        report: &mut GenerationReport,
        bundles: &mut JoinSet<(PathBuf, Result<u64>)>,
    ) -> Result<()> {
        for file in &plan.runtime {
            file.write()?;
        }
        report.files_written += plan.runtime.len();
        debug!(
            dir = %self.layout().runtime_sources_dir().display(),
            "Copied runtime files."
        );

        for component in &plan.components {
            self.emitter.write(component)?;
            report.files_written += component.files().len();
            report.components.push(component.component_name.clone());

            let stream = self.bundler.bundle(&component.simple_connector.path)?;
            let dest = component.bundled_connector.clone();
            bundles.spawn(async move {
                let result = stream.copy_to(&dest).await;
                (dest, result)
            });
            info!(
                component = %component.component_name,
                source = %component.source.display(),
                "Generated component."
            );
        }
        Ok(())
    }
}

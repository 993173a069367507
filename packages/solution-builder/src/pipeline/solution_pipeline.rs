//! Solution pipeline
//!
//! ```text
//! analyze:  root + manifest checks ─► discover ─► ingest ─► wire edges ─► close
//! run:      analyze ─► solution ─► DGML ─► debug listings ─► corrections
//! ```
//!
//! Nothing under the search root changes until every artifact is written.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::SolutionConfig;
use crate::errors::{Result, SolutionError};
use crate::features::closure::{BuildClosure, ClosureMode};
use crate::features::dependency_graph::{DependencyGraphBuilder, EdgeStats, ProjectGraph};
use crate::features::emission::{
    project_reference_writes, render_dgml, render_solution, write_artifact, write_debug_manifests,
    SolutionOptions,
};
use crate::features::evaluation::ProjectEvaluator;
use crate::features::ingestion::{
    absolute, apply_corrections, check_search_root, discover_projects, ingest_projects,
    CorrectionReport, IngestStats, PendingWrite,
};
use crate::features::manifest::BuildManifest;
use crate::shared::models::Duplicate;

/// Read-only result of analysing a tree
#[derive(Debug)]
pub struct Analysis {
    pub graph: ProjectGraph,
    pub closure: BuildClosure,
    pub duplicates: Vec<Duplicate>,

    /// Descriptor writes to replay after emission
    pub pending: Vec<PendingWrite>,

    pub ingest: IngestStats,
    pub edges: EdgeStats,

    /// `None` in all mode
    pub seeds: Option<usize>,
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub solution_path: PathBuf,
    pub graph_path: Option<PathBuf>,
    pub debug_manifests: Vec<PathBuf>,

    pub ingest: IngestStats,
    pub edges: EdgeStats,
    pub seeds: Option<usize>,
    pub in_build: usize,
    pub ignored: usize,
    pub duplicates: usize,
    pub corrections: CorrectionReport,

    pub elapsed: Duration,
}

/// Runs the whole pipeline against one evaluator
pub struct SolutionBuilder {
    config: SolutionConfig,
    evaluator: Arc<dyn ProjectEvaluator>,
}

impl SolutionBuilder {
    pub fn new(config: SolutionConfig, evaluator: Arc<dyn ProjectEvaluator>) -> Self {
        Self { config, evaluator }
    }

    pub fn config(&self) -> &SolutionConfig {
        &self.config
    }

    /// Discover, ingest, wire and close over `root` without writing anything
    pub fn analyze(&self, root: &Path) -> Result<Analysis> {
        self.config.validate()?;
        let root = absolute(root)?;
        check_search_root(&root)?;
        let globals = self.config.global_properties();

        let manifest = match &self.config.manifest {
            Some(manifest) => Some(BuildManifest::load(
                self.evaluator.as_ref(),
                &absolute(&manifest.path)?,
                &manifest.items_name,
                &globals,
            )?),
            None => None,
        };

        // A one-thread pool keeps source scanning sequential as well.
        let parallel = self.config.parallel.enabled;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.parallel.effective_workers())
            .build()
            .map_err(|e| SolutionError::pipeline(format!("Cannot build worker pool: {}", e)))?;

        let projects = discover_projects(&root)?;
        let outcome = pool.install(|| {
            ingest_projects(self.evaluator.as_ref(), &projects, &globals, parallel)
        });

        let (seeds, directives, mode) = match manifest {
            Some(manifest) => (
                Some(manifest.seeds.len()),
                manifest.directives,
                ClosureMode::Seeded(manifest.seeds),
            ),
            None => (None, Vec::new(), ClosureMode::All),
        };

        let (graph, edges) = DependencyGraphBuilder::new()
            .with_directives(directives)
            .build(outcome.contents.nodes);
        let closure = BuildClosure::compute(&graph, &mode);

        let mut pending = outcome.contents.pending;
        if self.config.output.use_project_references {
            pending.extend(project_reference_writes(&graph));
        }

        Ok(Analysis {
            graph,
            closure,
            duplicates: outcome.contents.duplicates,
            pending,
            ingest: outcome.stats,
            edges,
            seeds,
        })
    }

    /// Analyse `root`, write every artifact, then persist corrections
    pub fn run(&self, root: &Path, solution_path: &Path) -> Result<RunReport> {
        let start = Instant::now();
        let analysis = self.analyze(root)?;
        let solution_path = absolute(solution_path)?;

        let options = SolutionOptions {
            configuration: self.config.configuration.clone(),
            platform: self.config.platform.clone(),
            inline_dependencies: !self.config.output.use_project_references,
        };
        write_artifact(
            &solution_path,
            &render_solution(&analysis.graph, &analysis.closure, &options),
        )?;
        info!(path = %solution_path.display(), projects = analysis.closure.len(), "Solution written");

        let graph_path = if self.config.output.write_graph {
            let path = solution_path.with_extension("dgml");
            write_artifact(&path, &render_dgml(&analysis.graph))?;
            info!(path = %path.display(), "Dependency graph written");
            Some(path)
        } else {
            None
        };

        let debug_manifests = if self.config.output.write_debug_manifests {
            let directory = solution_path.parent().unwrap_or(Path::new("."));
            write_debug_manifests(directory, &analysis.graph, &analysis.closure)?
        } else {
            Vec::new()
        };

        // Descriptors change only once every artifact is on disk.
        let corrections = apply_corrections(
            self.evaluator.as_ref(),
            &self.config.global_properties(),
            &analysis.pending,
        );

        let report = RunReport {
            solution_path,
            graph_path,
            debug_manifests,
            in_build: analysis.closure.in_build.len(),
            ignored: analysis.closure.ignored.len(),
            duplicates: analysis.duplicates.iter().map(|d| d.rejected().len()).sum(),
            ingest: analysis.ingest,
            edges: analysis.edges,
            seeds: analysis.seeds,
            corrections,
            elapsed: start.elapsed(),
        };

        info!(
            discovered = report.ingest.discovered,
            valid = report.ingest.valid,
            bad = report.ingest.bad,
            managed = report.ingest.managed_descriptors,
            native = report.ingest.native_descriptors,
            seeds = report.seeds.unwrap_or(0),
            edges = report.edges.total(),
            in_build = report.in_build,
            ignored = report.ignored,
            duplicates = report.duplicates,
            corrections_applied = report.corrections.applied,
            corrections_failed = report.corrections.failed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Run complete"
        );
        Ok(report)
    }
}

//! Solution Builder CLI
//!
//! # Usage
//!
//! ```bash
//! # Every descriptor under src/ goes into the solution
//! solution-builder build src/ out/all.sln
//!
//! # Only what the manifest's official entry points need
//! solution-builder build src/ out/product.sln --manifest build.proj --items-name Official
//!
//! # Read an emitted solution back
//! solution-builder inspect out/product.sln
//!
//! # C# sources no project compiles
//! solution-builder orphans src/
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use solution_builder::config::{ManifestConfig, SolutionConfig};
use solution_builder::features::emission::read_solution;
use solution_builder::features::orphans::find_orphans;
use solution_builder::{SnapshotEvaluator, SolutionBuilder};

#[derive(Parser, Debug)]
#[command(name = "solution-builder")]
#[command(about = "Infer project dependencies and emit a build solution", long_about = None)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover projects under a root and write the solution
    Build {
        /// Root search directory
        root: PathBuf,

        /// Solution file to write
        solution: PathBuf,

        /// YAML configuration (version 1); flags override it
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        configuration: Option<String>,

        #[arg(long)]
        platform: Option<String>,

        /// Build manifest naming the official entry points
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Manifest item type listing the entry points
        #[arg(long, default_value = "BuildProjects")]
        items_name: String,

        /// Ingest on one thread
        #[arg(long)]
        sequential: bool,

        /// Worker threads (0 = one per CPU)
        #[arg(long)]
        workers: Option<usize>,

        /// Write dependencies into descriptors as project references
        #[arg(long)]
        project_references: bool,

        /// Write the plain-text debug listings beside the solution
        #[arg(long)]
        debug_manifests: bool,

        /// Skip the DGML graph
        #[arg(long)]
        no_graph: bool,
    },

    /// Print the projects and dependencies of a solution file
    Inspect {
        solution: PathBuf,
    },

    /// List C# sources no managed project compiles
    Orphans {
        root: PathBuf,

        #[arg(long, default_value = "Release")]
        configuration: String,

        #[arg(long, default_value = "x64")]
        platform: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build {
            root,
            solution,
            config,
            configuration,
            platform,
            manifest,
            items_name,
            sequential,
            workers,
            project_references,
            debug_manifests,
            no_graph,
        } => {
            let mut config = match config {
                Some(path) => SolutionConfig::from_yaml(&path)
                    .with_context(|| format!("Cannot load configuration {}", path.display()))?,
                None => SolutionConfig::default(),
            };
            if let Some(configuration) = configuration {
                config.configuration = configuration;
            }
            if let Some(platform) = platform {
                config.platform = platform;
            }
            if let Some(path) = manifest {
                config.manifest = Some(ManifestConfig { path, items_name });
            }
            if sequential {
                config.parallel.enabled = false;
            }
            if let Some(workers) = workers {
                config.parallel.num_workers = workers;
            }
            config.output.use_project_references |= project_references;
            config.output.write_debug_manifests |= debug_manifests;
            if no_graph {
                config.output.write_graph = false;
            }
            config.validate()?;

            let builder = SolutionBuilder::new(config, Arc::new(SnapshotEvaluator::new()));
            let report = builder.run(&root, &solution)?;
            info!(
                solution = %report.solution_path.display(),
                in_build = report.in_build,
                "Done"
            );
        }
        Commands::Inspect { solution } => {
            let parsed = read_solution(&solution)
                .with_context(|| format!("Cannot read solution {}", solution.display()))?;
            for project in &parsed.projects {
                println!("{} {} {}", project.project_id, project.name, project.path.display());
                for dep in parsed.dependency_paths(project) {
                    println!("    -> {}", dep.display());
                }
            }
            println!(
                "{} projects, {} dependencies, configurations: {}",
                parsed.projects.len(),
                parsed.edge_count(),
                parsed.configurations.join(", ")
            );
        }
        Commands::Orphans {
            root,
            configuration,
            platform,
        } => {
            let globals = SolutionConfig::new(configuration, platform).global_properties();
            let orphans = find_orphans(&root, &SnapshotEvaluator::new(), &globals)?;
            for path in &orphans {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

//! thesu CLI: compile a parsed corpus into hierarchical and force-directed DOT.
//!
//! Usage:
//!   thesu build --document corpus.json [--settings settings.yaml] [--out dir]
//!   thesu views --document corpus.json --settings settings.yaml [--out dir]
//!   thesu inspect --document corpus.json [--json]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use thesu::{
    load_document, write_artifacts, ArtifactKind, Artifacts, EntityKind, LayoutEngine, Pipeline,
    Settings, ThesuError,
};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "thesu",
    version,
    about = "Compile annotated thesis corpora into filtered graph descriptions"
)]
struct Cli {
    /// Log progress (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the filters of the settings file
    Build {
        #[command(flatten)]
        input: InputArgs,
        /// Output directory (overrides the settings file)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Artifact base name (overrides the settings file)
        #[arg(long)]
        basename: Option<String>,
        /// Layout engine that will render the output (overrides the settings file)
        #[arg(long, value_enum)]
        engine: Option<EngineArg>,
    },
    /// Render every named view of the settings file
    Views {
        #[command(flatten)]
        input: InputArgs,
        /// Output directory (overrides the settings file)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Summarize the extracted entity model
    Inspect {
        /// Parsed corpus tree (.json, .yaml or .yml)
        #[arg(long)]
        document: PathBuf,
        /// Print the entity model as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Parsed corpus tree (.json, .yaml or .yml)
    #[arg(long)]
    document: PathBuf,
    /// Settings file (YAML); defaults apply when omitted
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineArg {
    Dot,
    Fdp,
    Neato,
}

impl From<EngineArg> for LayoutEngine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Dot => LayoutEngine::Dot,
            EngineArg::Fdp => LayoutEngine::Fdp,
            EngineArg::Neato => LayoutEngine::Neato,
        }
    }
}

/// Read settings and corpus; an engine override applies before the dialects
/// pick up their layout tables
fn load(input: &InputArgs, engine: Option<EngineArg>) -> Result<(Pipeline, Settings), ThesuError> {
    let mut settings = match &input.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(engine) = engine {
        settings.layout.default_engine = engine.into();
    }
    let document = load_document(&input.document)?;
    let pipeline = Pipeline::from_document(&document)?.with_settings(&settings);
    for warning in pipeline.extraction_warnings() {
        eprintln!("Warning: {}", warning);
    }
    Ok((pipeline, settings))
}

fn report(name: &str, artifacts: &Artifacts, out: &Path, basename: &str) -> Result<(), ThesuError> {
    for warning in &artifacts.warnings {
        eprintln!("Warning ({}): {}", name, warning);
    }
    let paths = write_artifacts(out, basename, artifacts)?;
    println!(
        "{}: {} nodes, {} edges -> {}, {}",
        name,
        artifacts.graph.nodes.len(),
        artifacts.graph.edges.len(),
        paths.hierarchical.display(),
        paths.force_directed.display()
    );
    Ok(())
}

fn cmd_build(
    input: &InputArgs,
    out: Option<PathBuf>,
    basename: Option<String>,
    engine: Option<EngineArg>,
) -> Result<(), ThesuError> {
    let (pipeline, settings) = load(input, engine)?;
    let out = out.unwrap_or_else(|| settings.output.directory.clone());
    let basename = basename.unwrap_or_else(|| settings.output.basename.clone());

    let artifacts = pipeline.run(&settings.filters)?;
    report(&basename, &artifacts, &out, &basename)?;

    let engine = settings.layout.default_engine;
    let rendered = match engine.artifact() {
        ArtifactKind::Hierarchical => format!("{}.dot", basename),
        ArtifactKind::ForceDirected => format!("{}_gephi.dot", basename),
    };
    println!("{} renders {}", engine.as_str(), rendered);
    Ok(())
}

fn cmd_views(input: &InputArgs, out: Option<PathBuf>) -> Result<(), ThesuError> {
    let (pipeline, settings) = load(input, None)?;
    if settings.views.is_empty() {
        println!("No views defined.");
        return Ok(());
    }
    let out = out.unwrap_or_else(|| settings.output.directory.clone());

    // Validate every view before writing any output
    let mut rendered = Vec::with_capacity(settings.views.len());
    for (name, result) in pipeline.run_views(&settings.views) {
        let artifacts = result.map_err(|source| ThesuError::View {
            view: name.clone(),
            source,
        })?;
        rendered.push((name, artifacts));
    }
    for (name, artifacts) in &rendered {
        let basename = format!("{}_{}", settings.output.basename, name);
        report(name, artifacts, &out, &basename)?;
    }
    Ok(())
}

fn cmd_inspect(document: &Path, json: bool) -> Result<(), ThesuError> {
    let document = load_document(document)?;
    let pipeline = Pipeline::from_document(&document)?;
    let model = pipeline.model();

    if json {
        println!("{}", serde_json::to_string_pretty(model)?);
        return Ok(());
    }

    println!(
        "{:<16}  {:>7}  {:>12}  {:>6}  {:>9}",
        "SOURCE", "THESES", "PROPOSITIONS", "STEPS", "EXTRINSIC"
    );
    println!("{}", "-".repeat(58));
    for source in model.sources() {
        let mut counts = [0usize; 4];
        for entity in model.entities_in_source(source) {
            let slot = match entity.kind() {
                EntityKind::Thesis => 0,
                EntityKind::Proposition => 1,
                EntityKind::Sequence => 2,
                EntityKind::ExtrinsicElement => 3,
            };
            counts[slot] += 1;
        }
        println!(
            "{:<16}  {:>7}  {:>12}  {:>6}  {:>9}",
            source, counts[0], counts[1], counts[2], counts[3]
        );
    }
    println!(
        "{} entities, {} relations, {} warnings",
        model.entity_count(),
        model.relation_count(),
        pipeline.extraction_warnings().len()
    );
    for warning in pipeline.extraction_warnings() {
        println!("  {}", warning);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build {
            input,
            out,
            basename,
            engine,
        } => cmd_build(&input, out, basename, engine),
        Commands::Views { input, out } => cmd_views(&input, out),
        Commands::Inspect { document, json } => cmd_inspect(&document, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thesu::{DocumentNode, FilterConfig};

    fn input(dir: &Path) -> InputArgs {
        let corpus = DocumentNode::new("corpus").with_child(
            DocumentNode::new("source")
                .with_attr("id", "plut")
                .with_child(DocumentNode::new("thesis").with_attr("id", "plut.t1")),
        );
        let document = dir.join("corpus.json");
        std::fs::write(&document, serde_json::to_string(&corpus).unwrap()).unwrap();
        InputArgs {
            document,
            settings: None,
        }
    }

    #[test]
    fn test_engine_flag_reaches_force_directed_header() {
        let dir = tempfile::tempdir().unwrap();
        let input = input(dir.path());

        let (pipeline, settings) = load(&input, Some(EngineArg::Neato)).unwrap();
        assert_eq!(settings.layout.default_engine, LayoutEngine::Neato);
        let artifacts = pipeline.run(&settings.filters).unwrap();
        assert!(artifacts.force_directed.contains("    mode=\"sgd\";\n"));

        let (pipeline, _) = load(&input, None).unwrap();
        let artifacts = pipeline.run(&FilterConfig::default()).unwrap();
        assert!(artifacts.force_directed.contains("    start=\"regular\";\n"));
    }
}

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use docweave_engine::{
    generator_from_env, render_store, DocPipeline, DocStore, GenerationOptions, OutputFormat,
    OutputLayout, RunSummary, GENERATOR_MODE_ENV,
};
use docweave_splice::{ChunkPolicy, SourceUnit, Splitter};

#[derive(Parser)]
#[command(name = "docweave")]
#[command(about = "LLM-backed documentation generator for source trees", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Override the generator backend in this process
    #[arg(long, global = true, value_enum)]
    generator: Option<GeneratorFlag>,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a file or directory and write a documentation run
    Generate(GenerateArgs),

    /// Annotate a code fragment read from stdin
    Chunk(ChunkArgs),

    /// Print the chunk plan for a file without any generation request
    Split(SplitArgs),

    /// Re-render outputs from an existing documentation store
    Rebuild(RebuildArgs),
}

#[derive(Copy, Clone, ValueEnum)]
enum GeneratorFlag {
    Api,
    Stub,
}

impl GeneratorFlag {
    const fn as_str(self) -> &'static str {
        match self {
            GeneratorFlag::Api => "api",
            GeneratorFlag::Stub => "stub",
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum FormatFlag {
    Annotated,
    Comments,
    Markdown,
}

impl FormatFlag {
    const fn as_domain(self) -> OutputFormat {
        match self {
            FormatFlag::Annotated => OutputFormat::Annotated,
            FormatFlag::Comments => OutputFormat::Comments,
            FormatFlag::Markdown => OutputFormat::Markdown,
        }
    }
}

#[derive(Args)]
struct GenerationFlags {
    /// Model identifier
    #[arg(long)]
    model: Option<String>,

    /// Maximum response tokens per request
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,
}

impl GenerationFlags {
    fn to_options(&self) -> GenerationOptions {
        let mut options = GenerationOptions::default();
        if let Some(model) = &self.model {
            options.model = model.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            options.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            options.temperature = temperature;
        }
        options
    }
}

#[derive(Args)]
struct GenerateArgs {
    /// Source file or directory to document
    path: PathBuf,

    /// Output format to render after the run
    #[arg(long, value_enum, default_value_t = FormatFlag::Annotated)]
    format: FormatFlag,

    /// Base output directory; each run gets a timestamped subdirectory
    #[arg(long, default_value = "documentation")]
    out_dir: PathBuf,

    /// Target chunk size in lines
    #[arg(long)]
    chunk_lines: Option<usize>,

    /// Line count above which a file is split into chunks
    #[arg(long)]
    large_file_lines: Option<usize>,

    #[command(flatten)]
    generation: GenerationFlags,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ChunkArgs {
    /// Synthetic file name; its extension selects the language
    #[arg(long)]
    name: Option<String>,

    #[command(flatten)]
    generation: GenerationFlags,
}

#[derive(Args)]
struct SplitArgs {
    /// Source file to plan
    file: PathBuf,

    /// Target chunk size in lines
    #[arg(long)]
    chunk_lines: Option<usize>,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RebuildArgs {
    /// Run directory holding raw_documentation.json
    #[arg(long)]
    cache_dir: PathBuf,

    /// Output format to render
    #[arg(long, value_enum, default_value_t = FormatFlag::Annotated)]
    format: FormatFlag,

    /// Where to write rendered outputs (default: the cache directory)
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(mode) = cli.generator {
        env::set_var(GENERATOR_MODE_ENV, mode.as_str());
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Generate(args) => run_generate(args).await?,
        Commands::Chunk(args) => run_chunk(args).await?,
        Commands::Split(args) => run_split(args)?,
        Commands::Rebuild(args) => run_rebuild(args).await?,
    }

    Ok(())
}

fn chunk_policy(chunk_lines: Option<usize>, large_file_lines: Option<usize>) -> ChunkPolicy {
    let mut policy = ChunkPolicy::default();
    if let Some(target) = chunk_lines {
        policy.target_chunk_lines = target;
    }
    if let Some(limit) = large_file_lines {
        policy.large_file_lines = limit;
    }
    policy
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    run_dir: String,
    summary: &'a RunSummary,
}

/// Annotate a file or directory and write a full documentation run
async fn run_generate(args: GenerateArgs) -> Result<()> {
    let path = args.path.canonicalize().context("Invalid input path")?;
    let policy = chunk_policy(args.chunk_lines, args.large_file_lines);
    let generator = generator_from_env().context("Failed to construct a generator")?;
    let pipeline = DocPipeline::new(generator, policy, args.generation.to_options())?;

    let layout = OutputLayout::for_run(&args.out_dir);
    let (store, summary) = pipeline.run(&path, &layout).await?;
    render_store(&store, &layout, args.format.as_domain()).await?;

    if args.json {
        let output = GenerateOutput {
            run_dir: layout.root().display().to_string(),
            summary: &summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        eprintln!("{summary}");
        println!("{}", layout.root().display());
    }
    if summary.unit_count() > 0 && summary.failed_count() == summary.unit_count() {
        std::process::exit(1);
    }
    Ok(())
}

/// Annotate a fragment read from stdin and print the result
async fn run_chunk(args: ChunkArgs) -> Result<()> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
    if text.trim().is_empty() {
        bail!("No code on stdin");
    }

    let name = args
        .name
        .unwrap_or_else(|| format!("chunk_{}.rb", chrono::Local::now().format("%Y%m%d_%H%M%S")));
    let generator = generator_from_env().context("Failed to construct a generator")?;
    let pipeline = DocPipeline::new(
        generator,
        ChunkPolicy::default(),
        args.generation.to_options(),
    )?;

    let annotated = pipeline.annotate_fragment(&name, &text).await;
    println!("{}", annotated.record.annotated_code);
    Ok(())
}

#[derive(Serialize)]
struct PlanEntry {
    start_line: usize,
    end_line: usize,
    lines: usize,
}

#[derive(Serialize)]
struct SplitPlan {
    name: String,
    language: String,
    total_lines: usize,
    chunks: Vec<PlanEntry>,
}

/// Print the chunk plan for one file. Always splits, regardless of the
/// large-file routing threshold.
fn run_split(args: SplitArgs) -> Result<()> {
    let unit = SourceUnit::read(&args.file).context("Failed to read source file")?;
    let policy = chunk_policy(args.chunk_lines, None);
    policy.validate()?;
    let splitter = Splitter::new(policy);
    let chunks = splitter.split(&unit);

    if args.json {
        let plan = SplitPlan {
            name: unit.name.clone(),
            language: unit.language.as_str().to_string(),
            total_lines: unit.line_count(),
            chunks: chunks
                .iter()
                .map(|chunk| PlanEntry {
                    start_line: chunk.start_line,
                    end_line: chunk.end_line,
                    lines: chunk.line_count(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!(
            "{}: {} lines, {} chunk(s)",
            unit.name,
            unit.line_count(),
            chunks.len()
        );
        for chunk in &chunks {
            println!(
                "  {}-{} ({} lines)",
                chunk.start_line,
                chunk.end_line,
                chunk.line_count()
            );
        }
        if !chunks.is_empty() {
            println!("{}", Splitter::stats(&chunks));
        }
    }
    Ok(())
}

/// Re-render outputs from an existing documentation store
async fn run_rebuild(args: RebuildArgs) -> Result<()> {
    let store_layout = OutputLayout::at(&args.cache_dir);
    let store = DocStore::load(store_layout.store_path())
        .await
        .context("Failed to load documentation store")?;
    if store.is_empty() {
        bail!(
            "No documentation records in {}",
            store_layout.store_path().display()
        );
    }

    let out_layout = match &args.out_dir {
        Some(dir) => OutputLayout::at(dir),
        None => store_layout,
    };
    let written = render_store(&store, &out_layout, args.format.as_domain()).await?;
    eprintln!("Rendered {} file(s)", written.len());
    println!("{}", out_layout.root().display());
    Ok(())
}

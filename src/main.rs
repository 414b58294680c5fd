mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use tone_of_voice::config::ToneConfig;
use tone_of_voice::llm::{GenerationBackend, OpenAiCompatibleBackend};
use tone_of_voice::optimizer::DEFAULT_WORD_COUNT_RANGE;
use tone_of_voice::{
    optimize, score, signature_schema, Analyzer, Corpus, OptimizeRequest, StylePolicy,
};

#[derive(Parser)]
#[command(name = "tov", about = "Brand tone-of-voice analyzer, rewriter and scorer")]
struct Cli {
    /// Config file (defaults to $TOV_CONFIG_PATH, then config/tov.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive a signature from a corpus.
    Analyze(AnalyzeArgs),
    /// Rewrite a draft toward a signature.
    Optimize(OptimizeArgs),
    /// Score a text against a signature.
    Score(ScoreArgs),
    /// Print the signature JSON schema.
    Schema,
    /// Write the effective configuration to a file.
    InitConfig(InitConfigArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,
    #[arg(long)]
    file: Option<PathBuf>,
    /// Treat each non-empty line as a separate snippet.
    #[arg(long)]
    lines: bool,
    #[arg(long)]
    lang: Option<String>,
    #[arg(long)]
    brand: Option<String>,
    /// Print metrics and examples without calling the backend.
    #[arg(long)]
    metrics_only: bool,
}

#[derive(Args, Debug, Clone)]
struct OptimizeArgs {
    #[arg(long)]
    signature: PathBuf,
    #[arg(long)]
    text: Option<String>,
    #[arg(long, default_value = "")]
    task: String,
    #[arg(long, default_value = "")]
    audience: String,
    #[arg(long, default_value = "")]
    channel: String,
    #[arg(long, default_value = DEFAULT_WORD_COUNT_RANGE)]
    word_count_range: String,
    /// Skip the backend and apply the heuristic rewrite only.
    #[arg(long)]
    offline: bool,
}

#[derive(Args, Debug, Clone)]
struct ScoreArgs {
    #[arg(long)]
    signature: PathBuf,
    #[arg(long)]
    text: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long, default_value = "config/tov.toml")]
    path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8000)]
    port: u16,
    /// Directory of a static web UI to serve next to the API.
    #[arg(long)]
    web_root: Option<String>,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, _) = ToneConfig::load(cli.config)?;

    match cli.command {
        Command::Analyze(args) => run_analyze(args, &config).await,
        Command::Optimize(args) => run_optimize(args, &config).await,
        Command::Score(args) => run_score(args),
        Command::Schema => print_json(signature_schema()),
        Command::InitConfig(args) => {
            config.write(&args.path)?;
            println!("Wrote {}", args.path.display());
            Ok(())
        }
        Command::Serve(args) => server::serve(args, config).await,
    }
}

async fn run_analyze(args: AnalyzeArgs, config: &ToneConfig) -> Result<(), String> {
    let text = match args.file.as_ref() {
        Some(path) => read_file(path)?,
        None => read_text(args.text)?,
    };
    let corpus = if args.lines {
        Corpus::Snippets(text.lines().map(str::to_string).collect())
    } else {
        Corpus::Text(text)
    };

    let analyzer = Analyzer::new(&config.analysis);
    if args.metrics_only {
        let metrics = analyzer
            .compute(&corpus, args.lang.as_deref())
            .map_err(|err| err.to_string())?;
        let examples = analyzer.examples(&metrics);
        return print_json(&serde_json::json!({
            "metrics": metrics.to_value(),
            "examples": examples,
        }));
    }

    let backend = backend_from_config(config)?;
    let analysis = analyzer
        .analyze(
            &backend,
            &corpus,
            args.lang.as_deref(),
            args.brand.as_deref(),
            &config.backend.completion_options(),
        )
        .await
        .map_err(|err| err.to_string())?;

    print_json(&serde_json::json!({
        "metrics": analysis.metrics.to_value(),
        "examples": analysis.examples,
        "signature": analysis.signature,
    }))
}

async fn run_optimize(args: OptimizeArgs, config: &ToneConfig) -> Result<(), String> {
    let signature = read_signature(&args.signature)?;
    let request = OptimizeRequest {
        draft: read_text(args.text)?,
        task: args.task,
        audience: args.audience,
        channel: args.channel,
        word_count_range: args.word_count_range,
    };

    let backend = if args.offline {
        None
    } else {
        OpenAiCompatibleBackend::from_config(&config.backend)
    };
    let result = optimize(
        backend.as_ref().map(|b| b as &dyn GenerationBackend),
        &signature,
        &request,
        &config.backend.completion_options(),
    )
    .await;
    print_json(&result)
}

fn run_score(args: ScoreArgs) -> Result<(), String> {
    let signature = read_signature(&args.signature)?;
    let text = read_text(args.text)?;
    let result = score(&text, &StylePolicy::from_value(&signature));
    print_json(&result)
}

fn backend_from_config(config: &ToneConfig) -> Result<OpenAiCompatibleBackend, String> {
    OpenAiCompatibleBackend::from_config(&config.backend)
        .ok_or_else(|| format!("{} is not set", config.backend.api_key_env))
}

fn read_signature(path: &Path) -> Result<Value, String> {
    let contents = read_file(path)?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|err| format!("invalid signature JSON in {}: {}", path.display(), err))?;
    if !value.is_object() {
        return Err(format!("signature in {} must be a JSON object", path.display()));
    }
    Ok(value)
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|err| format!("failed reading {}: {}", path.display(), err))
}

fn read_text(arg: Option<String>) -> Result<String, String> {
    if let Some(text) = arg {
        if !text.trim().is_empty() {
            return Ok(text);
        }
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Err("missing text: pass --text or pipe stdin".to_string());
    }
    Ok(trimmed.to_string())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize output: {}", err))?;
    println!("{}", payload);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}

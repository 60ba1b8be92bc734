use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use clap::builder::TypedValueParser as _;
use codedrill::{
    CodeDrillError, DEFAULT_BASE_URL, DEFAULT_DIFFICULTY, DEFAULT_MODEL, DEFAULT_QUESTION_COUNT,
    FileGenerator, GeminiConfig, GeminiGenerator, QuestionSource, QuestionSourceConfig,
    TextGenerator,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Topic to pre-fill on the start screen
    #[arg(short, long)]
    topic: Option<String>,

    /// Number of questions to request
    #[arg(short, long, default_value_t = DEFAULT_QUESTION_COUNT, value_parser = clap::value_parser!(u16).range(1..=50).map(usize::from))]
    count: usize,

    /// Difficulty tier written into the prompt
    #[arg(long, default_value = DEFAULT_DIFFICULTY)]
    difficulty: String,

    /// Gemini model name
    #[arg(long, env = "CODEDRILL_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the Gemini API
    #[arg(long, env = "CODEDRILL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Replay a saved provider response instead of calling the API
    #[arg(long)]
    replay: Option<PathBuf>,

    /// File to write logs to
    #[arg(long, default_value = "codedrill.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _log_guard = init_logging(&args.log_file, args.verbose);

    let source = match build_source(&args) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    tracing::info!(count = args.count, model = %args.model, "starting codedrill");

    if let Err(e) = codedrill::run(source, args.topic).await {
        tracing::error!(error = %e, "quiz exited with an error");
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(log_file: &Path, verbose: u8) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let directory = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "codedrill.log".into());

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();

    guard
}

fn build_source(args: &Args) -> Result<QuestionSource, CodeDrillError> {
    let generator: Arc<dyn TextGenerator> = match &args.replay {
        Some(path) => Arc::new(FileGenerator::new(path)),
        None => {
            let api_key = args
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| {
                    CodeDrillError::Config(
                        "an API key is required (--api-key or GEMINI_API_KEY), or use --replay"
                            .to_string(),
                    )
                })?;
            let config = GeminiConfig {
                base_url: args.base_url.clone(),
                api_key,
                model: args.model.clone(),
                timeout: Duration::from_secs(args.timeout_secs),
            };
            Arc::new(GeminiGenerator::new(config)?)
        }
    };

    let config = QuestionSourceConfig {
        question_count: args.count,
        difficulty: args.difficulty.clone(),
    };
    Ok(QuestionSource::new(generator, config))
}

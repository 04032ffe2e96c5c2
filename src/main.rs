// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use app_controller::{Controller, RunOptions};

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod language_utils;
mod media;
mod providers;
mod quality;
mod reflow;
mod segment;
mod shaping;
mod subtitle_renderer;
mod transcribe;
mod translation;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe and translate a video's speech into subtitles (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Generate shell completions for polysub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory (defaults to '<stem>_output' next to each video)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force reprocessing even when outputs are up to date
    #[arg(short, long)]
    force_overwrite: bool,

    /// Transcribe only, skip the translation pass
    #[arg(long)]
    no_translate: bool,

    /// Skip the bilingual SRT and clean prose outputs
    #[arg(long)]
    no_bilingual: bool,

    /// Source language code (e.g. 'en'), or 'auto' to detect
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g. 'fa', 'es')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// polysub - speech-to-subtitle translation pipeline
///
/// Extracts the audio track from video files, transcribes the speech with
/// whisper.cpp, translates it through a LibreTranslate-compatible service,
/// and renders SRT/VTT/TXT subtitle files plus bilingual and prose variants.
#[derive(Parser, Debug)]
#[command(name = "polysub")]
#[command(version = "1.0.0")]
#[command(about = "Video speech transcription and subtitle translation")]
#[command(long_about = "polysub turns spoken video into translated subtitles.

EXAMPLES:
    polysub movie.mkv                        # Full pipeline with default config
    polysub -f movie.mkv                     # Force reprocessing
    polysub -s en -t fa movie.mkv            # Translate from English to Persian
    polysub --no-translate movie.mkv         # Transcription only
    polysub --log-level debug /movies/       # Process a directory with debug logging
    polysub completions bash > polysub.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory (defaults to '<stem>_output' next to each video)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force reprocessing even when outputs are up to date
    #[arg(short, long)]
    force_overwrite: bool,

    /// Transcribe only, skip the translation pass
    #[arg(long)]
    no_translate: bool,

    /// Skip the bilingual SRT and clean prose outputs
    #[arg(long)]
    no_bilingual: bool,

    /// Source language code (e.g. 'en'), or 'auto' to detect
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g. 'fa', 'es')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "polysub", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                input_path,
                output: cli.output,
                force_overwrite: cli.force_overwrite,
                no_translate: cli.no_translate,
                no_bilingual: cli.no_bilingual,
                source_language: cli.source_language,
                target_language: cli.target_language,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)
            .context(format!("Failed to load config file: {}", config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config
            .save(config_path)
            .context(format!("Failed to write default config to: {}", config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let run_options = RunOptions {
        no_translate: options.no_translate,
        no_bilingual: options.no_bilingual,
        force_overwrite: options.force_overwrite,
        output_dir: options.output.clone(),
    };

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        controller.run(options.input_path.clone(), run_options).await
    } else if options.input_path.is_dir() {
        controller
            .run_folder(options.input_path.clone(), run_options)
            .await
    } else {
        Err(anyhow!(
            "Input path does not exist: {:?}",
            options.input_path
        ))
    }
}

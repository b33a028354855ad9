use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lumen_assist::speech::{AudioPlayback, SpeechSynthesizer};
use lumen_assist::store::{FilePrefStore, PrefStore};
use lumen_assist::{Config, Daemon, Language, LanguageStore};

/// Lumen - camera-to-speech assistant daemon
#[derive(Parser)]
#[command(name = "lumen", version, about)]
struct Cli {
    /// Port for the ingest API
    #[arg(long, env = "LUMEN_PORT")]
    port: Option<u16>,

    /// Config file path (defaults to ~/.config/omni/lumen/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the daemon (the default)
    Run,
    /// Synthesize and play a test announcement
    TestSpeech {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the speech output.")]
        text: String,
    },
    /// Set the announcement language
    SetLanguage {
        /// Language name or tag (e.g. "Hindi" or "hi")
        language: String,
    },
    /// Show the current announcement language
    GetLanguage,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,lumen_assist=info",
        1 => "info,lumen_assist=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config, cli.port)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => Daemon::new(config).run().await?,
        Command::TestSpeech { text } => test_speech(&config, &text).await?,
        Command::SetLanguage { language } => set_language(&language, config.default_language).await?,
        Command::GetLanguage => get_language(config.default_language).await?,
    }

    Ok(())
}

/// Synthesize the given text once and play it
async fn test_speech(config: &Config, text: &str) -> anyhow::Result<()> {
    let api_key = config
        .speech
        .api_key
        .clone()
        .context("speech API key required (set OPENAI_API_KEY)")?;

    let synthesizer = SpeechSynthesizer::new(
        api_key,
        config.speech.model.clone(),
        config.speech.voice.clone(),
        config.speech.speed,
    )?;
    let playback = AudioPlayback::new()?;

    let language = LanguageStore::load(pref_store()?, config.default_language)
        .await
        .get()
        .await;

    let audio = synthesizer.synthesize(text, language).await?;
    playback.play_mp3(&audio).await?;

    Ok(())
}

async fn set_language(name: &str, default: Language) -> anyhow::Result<()> {
    let language: Language = name.parse()?;

    LanguageStore::load(pref_store()?, default)
        .await
        .set(language)
        .await;

    println!("{language}");
    Ok(())
}

async fn get_language(default: Language) -> anyhow::Result<()> {
    let current = LanguageStore::load(pref_store()?, default)
        .await
        .get()
        .await;

    println!("{current} ({})", current.as_tag());
    Ok(())
}

fn pref_store() -> anyhow::Result<Arc<dyn PrefStore>> {
    let path = FilePrefStore::default_path().context("cannot determine config directory")?;
    Ok(Arc::new(FilePrefStore::new(path)))
}

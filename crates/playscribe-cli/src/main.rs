use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use playscribe_cli::Language;
use playscribe_cli::commands;
use playscribe_browser::DEFAULT_DEBUGGING_PORT;
use playscribe_core::Progress;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "playscribe")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Record browser interactions and turn them into automation scripts",
    long_about = "PlayScribe opens Chrome, watches what you click and type, and writes a \
                  replayable Playwright script (plus a JSON trace) when you close the browser."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open Chrome at a URL and record interactions into a script
    Record {
        /// Page to start recording on (https:// is assumed when no scheme is given)
        #[arg(value_name = "URL")]
        url: String,

        /// Directory the script and trace are written to
        #[arg(short, long, env = "PLAYSCRIBE_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Language of the generated script
        #[arg(short, long, value_enum, default_value = "javascript")]
        language: Language,

        /// Path to the Chrome binary
        #[arg(long, env = "PLAYSCRIBE_CHROME_PATH")]
        chrome_path: Option<PathBuf>,

        /// Use a named persistent profile (~/.playscribe/profiles/<NAME>)
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,

        /// Use a temporary profile even if --profile is given
        #[arg(long)]
        temp: bool,

        /// Chrome remote debugging port
        #[arg(long, default_value_t = DEFAULT_DEBUGGING_PORT)]
        port: u16,

        /// Seconds to wait for the browser to close before giving up
        #[arg(long, default_value_t = 300)]
        timeout: u64,

        /// Do not write a trace file
        #[arg(long)]
        no_trace: bool,

        /// Do not capture screenshots into the trace
        #[arg(long)]
        no_screenshots: bool,
    },

    /// Render a saved trace file into a script
    Render {
        /// Path to the trace file
        #[arg(value_name = "TRACE")]
        file: PathBuf,

        /// Language of the generated script
        #[arg(short, long, value_enum, default_value = "javascript")]
        language: Language,

        /// Write the script to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for playscribe.\n\n\
        SUPPORTED SHELLS:\n  bash, zsh, fish, powershell, elvish\n\n\
        INSTALLATION:\n  \
        bash: playscribe completion --shell bash >> ~/.bashrc\n  \
        zsh:  playscribe completion --shell zsh > ~/.zfunc/_playscribe  (ensure ~/.zfunc is in fpath in ~/.zshrc)\n  \
        fish: playscribe completion --shell fish > ~/.config/fish/completions/playscribe.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(short, long, value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        // Recording failures have already gone through the progress updates
        Err(e) if e.downcast_ref::<commands::record::Reported>().is_some() => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}", Progress::Failed(format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Record {
            url,
            output_dir,
            language,
            chrome_path,
            profile,
            temp,
            port,
            timeout,
            no_trace,
            no_screenshots,
        } => commands::record::execute(commands::record::RecordArgs {
            url,
            output_dir,
            language: language.into(),
            chrome_path,
            profile,
            temp,
            port,
            timeout_secs: timeout,
            trace: !no_trace,
            screenshots: !no_screenshots,
        }),
        Commands::Render {
            file,
            language,
            output,
        } => commands::render::execute(&file, language.into(), output.as_deref()),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("playscribe=debug,playscribe_core=debug,playscribe_browser=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("playscribe=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

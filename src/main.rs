use std::net::SocketAddr;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lcalc::config::{
    DEFAULT_SERVER_NUMERAL, DEFAULT_SERVER_STEPS, EntryPoint, RunConfig, ServerConfig,
};
use lcalc::loader::ModuleLoader;

#[derive(Parser, Debug)]
#[command(name = "lcalc")]
#[command(about = "Untyped lambda calculus with modules")]
struct Cli {
    /// More logging on stderr (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a definition and print its normal form
    Run {
        /// PATH[:NAME], a module file or a directory holding main.lcalc
        entry: String,
        /// Give up after this many beta steps
        #[arg(long)]
        max_steps: Option<usize>,
        /// Extension of module files, defaults to the entry file's
        #[arg(long = "ext")]
        extension: Option<String>,
        /// Show de Bruijn indices and reference kinds
        #[arg(short, long)]
        annotate: bool,
    },
    /// Serve the browser playground
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
        /// Step limit applied to every request
        #[arg(long, default_value_t = DEFAULT_SERVER_STEPS)]
        max_steps: usize,
        /// Largest numeral literal a request may use
        #[arg(long, default_value_t = DEFAULT_SERVER_NUMERAL)]
        max_numeral: usize,
    },
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: &RunConfig) -> anyhow::Result<String> {
    let entry = config.entry.absolute();
    let loader = ModuleLoader::new(config.source());
    let context = loader
        .load_context(&config.entry.module)
        .with_context(|| format!("loading modules from {}", config.entry.root.display()))?;
    let normal_form = match config.max_steps {
        Some(max_steps) => {
            let evaluation = context
                .eval_bounded(&entry, max_steps)
                .with_context(|| format!("evaluating {}", entry))?;
            info!(steps = evaluation.steps, "evaluated {}", entry);
            evaluation.normal_form
        }
        None => context
            .eval(&entry)
            .with_context(|| format!("evaluating {}", entry))?,
    };
    Ok(if config.annotate {
        normal_form.annotated().to_string()
    } else {
        normal_form.to_string()
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run {
            entry,
            max_steps,
            extension,
            annotate,
        } => {
            let entry = EntryPoint::parse(&entry)
                .with_context(|| format!("invalid entry point {:?}", entry))?;
            let mut config = RunConfig::new(entry);
            if let Some(extension) = extension {
                config.extension = extension;
            }
            config.max_steps = max_steps;
            config.annotate = annotate;
            // evaluation is synchronous and single threaded
            let output = tokio::task::block_in_place(|| run(&config))?;
            println!("{}", output);
        }
        Command::Serve {
            addr,
            max_steps,
            max_numeral,
        } => {
            let config = ServerConfig {
                addr,
                max_steps,
                max_numeral,
            };
            lcalc::server::serve(config).await?;
        }
    }
    Ok(())
}

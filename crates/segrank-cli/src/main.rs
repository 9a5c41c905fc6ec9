use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use segrank_core::config::Config;
use segrank_core::error::SrResult;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Latent-feature leaderboards for segment efforts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with training, board and loader settings
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Clean(cmd::clean::CleanArgs),
    Train(cmd::train::TrainArgs),
    Rank(cmd::rank::RankArgs),
    Evaluate(cmd::evaluate::EvaluateArgs),
    Correlate(cmd::correlate::CorrelateArgs),
}

/// File settings first, then anything typed on the command line.
fn resolve_config(path: Option<&PathBuf>, cli_config: &Config, sub_matches: &ArgMatches) -> Config {
    match path {
        Some(path) => {
            info!("⚙️  Loading config from {:?}", path);
            let mut config = Config::load_from_file(path).unwrap_or_else(|e| {
                error!("{}", e);
                process::exit(1);
            });
            config.merge_from_cli(cli_config, sub_matches);
            config
        }
        None => cli_config.clone(),
    }
}

fn init_logging(debug: bool) {
    if debug {
        tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();
    } else {
        tracing_subscriber::fmt::init();
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_logging(cli.debug);

    let Some((_, sub_matches)) = matches.subcommand() else {
        warn!("No subcommand given");
        process::exit(2);
    };

    let result: SrResult<()> = match cli.command {
        Commands::Clean(args) => {
            let config = resolve_config(cli.config.as_ref(), &args.config, sub_matches);
            cmd::clean::run(args, &config)
        }
        Commands::Train(args) => {
            let config = resolve_config(cli.config.as_ref(), &args.config, sub_matches);
            cmd::train::run(args, &config)
        }
        Commands::Rank(args) => {
            let config = resolve_config(cli.config.as_ref(), &args.config, sub_matches);
            cmd::rank::run(args, &config)
        }
        Commands::Evaluate(args) => {
            let config = resolve_config(cli.config.as_ref(), &args.config, sub_matches);
            cmd::evaluate::run(args, &config)
        }
        Commands::Correlate(args) => cmd::correlate::run(args),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}

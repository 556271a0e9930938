use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use mixforge::config::Config;
use mixforge::loader::load_tracks;
use mixforge::scorer::build_cache;
use mixforge::MfResult;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration; flags given on the command line override it.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for a low-cost ordering of a track list.
    Search(cmd::search::SearchArgs),
    /// Score a track list in its given order.
    Validate(cmd::validate::ValidateArgs),
}

fn main() {
    // Raw matches tell user input apart from defaults.
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(e) = run(&cli, &matches) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli, matches: &clap::ArgMatches) -> MfResult<()> {
    let (cli_config, tracks_path) = match &cli.command {
        Commands::Search(args) => (&args.config, &args.tracks),
        Commands::Validate(args) => (&args.config, &args.tracks),
    };
    // Subcommand flags live in the subcommand's matches, not the root.
    let sub_matches = matches.subcommand().map(|(_, m)| m).unwrap_or(matches);

    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {}", path);
            let mut config = Config::load_from_file(path)?;
            config.merge_from_cli(cli_config, sub_matches);
            config.sanitized()
        }
        None => cli_config.clone().sanitized(),
    };

    info!("Loading tracks from {}", tracks_path);
    let tracks = load_tracks(tracks_path)?;
    let (cache, normalizer) = build_cache(&tracks)?;

    match &cli.command {
        Commands::Search(args) => cmd::search::run(args, &tracks, &cache, &normalizer, config),
        Commands::Validate(_) => cmd::validate::run(&tracks, &cache, &normalizer, &config),
    }
}

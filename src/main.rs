use clap::Parser;
use gitstatus::config::Config;
use gitstatus::render::{OutputFormat, render};
use gitstatus::{AppResult, DetachedHeadStyle, GitExecutor, TagPolicy, gitstatus};
use std::env;
use std::path::PathBuf;

/// Print the git status of a directory as shell prompt segments
#[derive(Debug, Parser)]
#[command(name = "gitstatus", version)]
struct Cli {
    /// Directory to inspect (defaults to the current directory)
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Configuration file (defaults to ~/.config/gitstatus/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: plain, ansi or json
    #[arg(long, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// Tag to show: none, contains, last, annotated or exact
    #[arg(long)]
    tag: Option<TagPolicy>,

    /// Search for the .git directory instead of using `git -C`
    #[arg(long)]
    no_fast: bool,

    /// Name shown for a detached HEAD: revision or ref
    #[arg(long)]
    detached_head: Option<DetachedHeadStyle>,

    /// Do not mark the branch dirty when only untracked files exist
    #[arg(long)]
    untracked_not_dirty: bool,

    /// Only inspect directories below this path (repeatable)
    #[arg(long = "trusted", value_name = "PATH")]
    trusted: Vec<PathBuf>,

    /// Skip `git status`; show branch, stashes and tag only
    #[arg(long)]
    skip_status: bool,

    /// Log git invocations to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn load_config(cli: &Cli) -> AppResult<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(tag) = cli.tag {
        config.tag_policy = tag;
    }
    if let Some(style) = cli.detached_head {
        config.detached_head_style = style;
    }
    if cli.no_fast {
        config.fast_mode = false;
    }
    if cli.untracked_not_dirty {
        config.untracked_counts_as_dirty = false;
    }
    if cli.skip_status {
        config.skip_status = true;
    }
    if !cli.trusted.is_empty() {
        config.trusted_paths = cli.trusted.clone();
    }

    Ok(config)
}

fn run(cli: &Cli) -> AppResult<Option<String>> {
    let config = load_config(cli)?;
    let executor = GitExecutor::with_program(&config.git_binary);

    // An unreadable working directory is treated like no directory at all
    let cwd = match &cli.cwd {
        Some(dir) => dir.clone(),
        None => env::current_dir().unwrap_or_default(),
    };

    let Some(segments) = gitstatus(&cwd, &config.options(), &executor)? else {
        return Ok(None);
    };

    let output = render(&segments, cli.format).map_err(std::io::Error::other)?;
    Ok(Some(output))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

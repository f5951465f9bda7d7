mod watch;

use anyhow::{Context, Result};
use markdown_blocktree_config::Config;
use markdown_blocktree_engine::Parser;
use markdown_blocktree_engine::parsing::snapshot::{FormatOptions, format_tree_with};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use std::{env, process};
use watch::{Debouncer, FileWatcher};

const USAGE: &str =
    "<file.md> [--stats] [--watch] [--config <path>] | --write-config [--config <path>]";

/// How long the watch loop blocks for file events when nothing is pending.
const IDLE_WAIT: Duration = Duration::from_secs(1);

#[derive(Debug, Default, PartialEq)]
struct Args {
    file: PathBuf,
    stats: bool,
    watch: bool,
    write_config: bool,
    config: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut file = None;
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--stats" => parsed.stats = true,
            "--watch" => parsed.watch = true,
            "--write-config" => parsed.write_config = true,
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            path if file.is_none() => file = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument {extra}")),
        }
    }

    match file {
        Some(file) => parsed.file = file,
        None if parsed.write_config => {}
        None => return Err("no markdown file given".into()),
    }
    Ok(parsed)
}

fn parse_and_print(parser: &mut Parser, source: &str, stats: bool) {
    match parser.parse(source) {
        Ok(document) => {
            print!("{}", format_tree_with(&document, FormatOptions { ids: true }));
            if stats {
                println!("-- {}", parser.last_stats());
            }
        }
        // Keep going: the parser still holds the last good document.
        Err(e) => eprintln!("Error: {e}"),
    }
}

/// Saves `config` to the explicit path, or to the default location when none is given.
fn write_config(config: &Config, config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => {
            let path = Config::resolve_path(path);
            config.save_to_path(&path)?;
            Ok(path)
        }
        None => {
            config.save()?;
            Ok(Config::config_path())
        }
    }
}

fn run_watch(args: &Args, config: &Config, parser: &mut Parser) -> Result<()> {
    let watcher = FileWatcher::new(&args.file)?;
    let mut debouncer = Debouncer::new(config.watch.debounce());
    log::info!(
        "Watching {} (debounce {:?})",
        watcher.path().display(),
        config.watch.debounce()
    );

    let source = watcher
        .read()
        .with_context(|| format!("Failed to read {}", watcher.path().display()))?;
    debouncer.submit(source, Instant::now());

    loop {
        let wait = debouncer.remaining(Instant::now()).unwrap_or(IDLE_WAIT);
        if let Some(source) = watcher.next_change(wait)?
            && debouncer.submit(source, Instant::now())
        {
            log::debug!("change queued");
        }

        if let Some(source) = debouncer.poll(Instant::now()) {
            parse_and_print(parser, &source, args.stats);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let program = env::args().next().unwrap_or_else(|| "markdown-blocktree".into());
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {program} {USAGE}");
            process::exit(1);
        }
    };

    let config = match Config::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    log::debug!("Parser options: {:?}", config.parser);

    if args.write_config {
        let path = write_config(&config, args.config.as_deref())?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let mut parser = Parser::new(config.parser.clone());

    if args.watch {
        return run_watch(&args, &config, &mut parser);
    }

    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let document = parser.parse(&source)?;
    print!("{}", format_tree_with(&document, FormatOptions { ids: true }));
    if args.stats {
        println!("-- {}", parser.last_stats());
    }
    Ok(())
}

use std::fs;
use std::path::PathBuf;
use structopt::StructOpt;
use anyhow::{Context, Result};
use tanner_core::Scale;
use tanner_replay::{load_config, replay_files, ReplayConfig, ReplayJob};
use tracing_subscriber::EnvFilter;

#[derive(StructOpt, Debug)]
#[structopt(name = "tanner-replay")]
struct Opt {
    /// Intent script (YAML sequence)
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Snapshot JSON to start from
    #[structopt(parse(from_os_str), short = "l", long = "load")]
    load: Option<PathBuf>,

    /// Replay settings (YAML)
    #[structopt(parse(from_os_str), short = "c", long = "config")]
    config: Option<PathBuf>,

    /// Write the final snapshot here instead of stdout
    #[structopt(parse(from_os_str), short = "o", long = "out")]
    out: Option<PathBuf>,

    /// Print each recorded history entry
    #[structopt(long = "history")]
    history: bool,

    /// Initial scale, overriding the config file
    #[structopt(short = "s", long = "scale")]
    scale: Option<u32>,

    /// Log filter used when RUST_LOG is unset
    #[structopt(long = "log-level")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();

    let mut config = match &opt.config {
        Some(path) => load_config(path)?,
        None => ReplayConfig::default(),
    };
    if let Some(scale) = opt.scale {
        config.editor.scale = Scale::new(scale).context("scale must be positive")?;
    }
    config.history |= opt.history;
    if opt.log_level.is_some() {
        config.log_level = opt.log_level.clone();
    }

    let level = config.log_level.as_deref().unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let show_history = config.history;
    let job = ReplayJob {
        script: opt.script,
        load: opt.load,
        config,
    };
    let report = replay_files(&job)?;

    if show_history {
        for entry in &report.history {
            println!("state:{}", entry);
        }
    }

    match &opt.out {
        Some(path) => fs::write(path, &report.snapshot)
            .with_context(|| format!("write {}", path.display()))?,
        None => println!("{}", report.snapshot),
    }
    Ok(())
}

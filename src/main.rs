//! Embedit - a terminal text view driven by an embedded Neovim.
//!
//! # Usage
//!
//! ```bash
//! embedit notes.txt
//! embedit --clean --quit-key ctrl-q notes.txt
//! embedit --nvim /opt/nvim/bin/nvim --timeout-ms 5000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use embedit::app::App;
use embedit::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use embedit::input::KeyBinding;
use embedit::perf;
use embedit::session::NvimOptions;

/// A terminal text view whose editing is done by an embedded Neovim
#[derive(Parser, Debug)]
#[command(name = "embedit", version, about, long_about = None)]
struct Cli {
    /// File to load into the buffer at startup
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Neovim executable to embed
    #[arg(long, value_name = "PATH")]
    nvim: Option<PathBuf>,

    /// Start Neovim without user config or plugins
    #[arg(long)]
    clean: bool,

    /// How long to wait for each RPC reply, in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Key that closes the window (e.g. esc, ctrl-q, f10)
    #[arg(long, value_name = "KEY")]
    quit_key: Option<String>,

    /// Write forwarded keys, repaints, and RPC timings to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(raw_args.get(1..).unwrap_or_default());

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("EMBEDIT_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        tracing::warn!(
            path = %debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            error = %err,
            "failed to open debug log"
        );
    }

    let quit_key = match &effective.quit_key {
        Some(spec) => spec
            .parse::<KeyBinding>()
            .with_context(|| format!("Invalid --quit-key {spec:?}"))?,
        None => KeyBinding::default(),
    };

    let mut nvim = NvimOptions::default();
    if let Some(program) = effective.nvim {
        nvim.program = program;
    }
    nvim.clean = effective.clean;
    if let Some(ms) = effective.timeout_ms {
        nvim.timeout = Duration::from_millis(ms.max(1));
    }

    let app = App::new(cli.file)
        .with_nvim_options(nvim)
        .with_quit_key(quit_key);

    app.run().context("Application error")
}

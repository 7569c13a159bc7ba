//! Console entry point.

use std::io;

use anyhow::Context;
use satchel_cli::{Config, ConsolePrompter, roster};

fn main() -> anyhow::Result<()> {
    satchel_observability::init();

    let config = Config::from_env()?;
    roster::ensure_directory(&config.inventory_dir)
        .with_context(|| format!("inventory directory {} is unusable", config.inventory_dir.display()))?;
    tracing::info!(dir = %config.inventory_dir.display(), "using inventory directory");

    let stdin = io::stdin();
    let mut prompter = ConsolePrompter::new(stdin.lock(), io::stdout());
    let mut out = io::stdout();

    let mut session = roster::select_or_create(&config.inventory_dir, &mut prompter, &mut out)?;
    session.run(&mut prompter, &mut out)
}

use std::{fs::File, path::Path};

use anyhow::Context as _;
use env_logger::{Env, Target};

/// Initializes the global logger.
///
/// `RUST_LOG` overrides `default_filter`. When `log_file` is given, records go
/// to that file instead of stderr.
pub(crate) fn init(log_file: Option<&Path>, default_filter: &str) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder
        .try_init()
        .context("failed to initialize logger")?;
    Ok(())
}

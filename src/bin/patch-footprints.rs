use clap::{ArgAction, Parser};
use tracing::info;

use footprint_patcher::{patch_footprints, Layout};

/// Merge footprint libraries into the installed ergogen package and
/// regenerate its footprint index.
#[derive(Debug, Parser)]
#[command(name = "patch-footprints", version, about)]
struct Cli {
    /// Libraries to merge, in order; must include `ergogen` itself
    libraries: Vec<String>,

    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let layout = Layout::default();
    let outcome = patch_footprints(&layout, &cli.libraries).await?;

    if outcome.backup_created {
        info!(path = %layout.backup_dir().display(), "preserved original footprints");
    }
    info!(
        files = outcome.files_copied,
        exports = outcome.exports.len(),
        "patched footprints and regenerated index"
    );
    Ok(())
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(verbose >= 2))
        .init();
}

use anyhow::Context;

use reviewdesk_cli::Shell;
use reviewdesk_infra::ReviewStore;

fn main() -> anyhow::Result<()> {
    reviewdesk_observability::init();

    let store = ReviewStore::from_env().context("failed to open review store")?;
    tracing::info!(data_dir = %store.config().data_dir.display(), "review store ready");

    let report = store.replay_report();
    if report.skipped() > 0 {
        tracing::warn!(skipped = report.skipped(), "some log records were skipped during startup");
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Shell::new(store, stdin.lock(), stdout.lock())
        .run()
        .context("terminal I/O failed")?;
    Ok(())
}

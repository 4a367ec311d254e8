use anyhow::{Context, Result};
use taskhub_core::{BootstrapOptions, Handle, WorkspaceClient, bootstrap};

use crate::cli::RunArgs;
use crate::output::{print_bootstrap_report, print_success};

pub async fn run(client: &dyn WorkspaceClient, root: &Handle, args: &RunArgs) -> Result<()> {
    let options = BootstrapOptions {
        append_links: !args.skip_links,
    };
    let report = bootstrap(client, root, options)
        .await
        .with_context(|| format!("Bootstrap under root page {} failed", root.id))?;

    print_bootstrap_report(&report);
    print_success(&format!(
        "Done. Open your Notion dashboard page to see '{}'.",
        taskhub_core::blueprint::DASHBOARD_TITLE
    ));
    Ok(())
}

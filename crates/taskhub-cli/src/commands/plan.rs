use anyhow::{Context, Result};
use taskhub_core::{BootstrapOptions, Handle, WorkspaceClient, plan};

use crate::cli::RunArgs;
use crate::output::print_plan;

pub async fn run(client: &dyn WorkspaceClient, root: &Handle, args: &RunArgs) -> Result<()> {
    let options = BootstrapOptions {
        append_links: !args.skip_links,
    };
    let report = plan(client, root, options)
        .await
        .with_context(|| format!("Planning under root page {} failed", root.id))?;

    print_plan(&report);
    Ok(())
}

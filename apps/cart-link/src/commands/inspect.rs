//! Token diagnostics.

use super::restore::token_from_input;
use super::InspectArgs;
use crate::context::AppContext;
use crate::error::CliResult;

/// Run the inspect command.
///
/// Prints the inspection report as JSON. A token that fails to verify is
/// still a successful inspection; its problems are listed in the report.
pub async fn run(args: InspectArgs, ctx: &AppContext) -> CliResult<()> {
    let token = token_from_input(&args.token, &ctx.config.share.query_param)?;
    let inspection = ctx.codec().await.inspect(&token);
    println!("{}", serde_json::to_string_pretty(&inspection)?);
    Ok(())
}

//! Users command: print the gateway's user list.

use anyhow::Result;
use clap::Args;

use cloudinfra::{CallResult, Session};

use crate::output;

#[derive(Args, Debug)]
pub struct UsersArgs {
    /// Profile to authenticate with (defaults to the standard resolution order)
    #[arg(long)]
    pub profile: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: UsersArgs) -> Result<()> {
    let mut builder = Session::builder();
    if let Some(profile) = &args.profile {
        builder = builder.profile(profile);
    }
    let session = builder.build().await?;

    match session.get_users().await? {
        CallResult::Json(value) if args.pretty => output::json_pretty(&value)?,
        CallResult::Json(value) => output::json(&value)?,
        CallResult::Text(text) => println!("{text}"),
        CallResult::Empty => {}
    }
    Ok(())
}

//! Export command: print credentials as shell exports.

use anyhow::{Context, Result};
use clap::Args;

use cloudinfra::config::{self, CredentialProvider, FileProvider};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Profile to export (defaults to the standard resolution order)
    pub profile: Option<String>,
}

pub fn run(args: ExportArgs) -> Result<()> {
    let credentials = match &args.profile {
        Some(profile) => FileProvider::for_profile(profile)
            .load()?
            .with_context(|| format!("profile '{profile}' produced no credentials"))?,
        None => config::resolve_default()?,
    };

    // Leading space: keeps the secrets out of shells that honour
    // HISTCONTROL=ignorespace.
    println!(" export CLOUDINFRA_APP={}", credentials.app());
    println!(" export CLOUDINFRA_KEY={}", credentials.key().unwrap_or_default());
    println!(
        " export CLOUDINFRA_SECRET={}",
        credentials.secret().unwrap_or_default()
    );
    println!(" export CLOUDINFRA_URL={}", credentials.base_url());

    Ok(())
}

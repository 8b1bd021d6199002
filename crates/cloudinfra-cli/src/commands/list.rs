//! List command: print stored profile names.

use anyhow::Result;
use clap::Args;

use cloudinfra::config::{DEFAULT_PROFILE, list_profiles};

#[derive(Args, Debug)]
pub struct ListArgs {}

pub fn run(_args: ListArgs) -> Result<()> {
    for profile in list_profiles()? {
        if profile != DEFAULT_PROFILE {
            println!("{profile}");
        }
    }
    Ok(())
}

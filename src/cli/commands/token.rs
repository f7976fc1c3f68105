use anyhow::Context;

use crate::auth::{generate_jwt, Claims};

/// Print a signed token for the given tenant and user
pub fn handle(org: &str, user: &str) -> anyhow::Result<()> {
    if org.trim().is_empty() {
        anyhow::bail!("--org must not be empty");
    }

    let token = generate_jwt(&Claims::new(org, user)).context("failed to sign token")?;
    println!("{}", token);
    Ok(())
}

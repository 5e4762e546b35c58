//! Sign-in, sign-out, and session inspection.

use super::{CliError, Context};

/// Role sent on registration; the CLI only creates ordinary accounts.
const DEFAULT_ROLE: &str = "user";

/// Sign in with email and password.
pub async fn login(email: &str, password: &str) -> Result<(), CliError> {
    let mut ctx = Context::from_env()?;
    let identity = ctx.session.login(email, password).await?;
    println!("Logget ind som {} <{}>", identity.name, identity.email);
    Ok(())
}

/// Create an account and sign in.
pub async fn register(name: &str, email: &str, password: &str) -> Result<(), CliError> {
    let mut ctx = Context::from_env()?;
    let identity = ctx
        .session
        .register(name, email, password, DEFAULT_ROLE)
        .await?;
    println!("Konto oprettet. Logget ind som {} <{}>", identity.name, identity.email);
    Ok(())
}

/// Sign out. Safe to run while already signed out.
pub fn logout() -> Result<(), CliError> {
    let mut ctx = Context::from_env()?;
    ctx.session.logout();
    println!("Logget ud.");
    Ok(())
}

/// Print the signed-in identity, if any.
pub fn whoami() -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    match ctx.session.identity() {
        Some(identity) => {
            println!("{} <{}> ({})", identity.name, identity.email, identity.role);
        }
        None => println!("Ikke logget ind."),
    }
    Ok(())
}

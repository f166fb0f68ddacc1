//! Authentication commands for nikeplus-cli

use crate::client::NikePlusClient;
use crate::config::ClientConfig;
use crate::error::{NikePlusError, Result};
use std::io::{self, Write};

/// Build a client configuration from command-line values, prompting for anything missing
pub fn resolve_config(
    email: Option<String>,
    password: Option<String>,
    debug: bool,
) -> Result<ClientConfig> {
    let email = match email.filter(|e| !e.trim().is_empty()) {
        Some(e) => e.trim().to_string(),
        None => prompt_line("Email: ")?,
    };
    if email.is_empty() {
        return Err(NikePlusError::config("Missing NIKEPLUS_EMAIL"));
    }

    let password = match password {
        Some(p) => p,
        None => rpassword_prompt("Password: ")?,
    };

    Ok(ClientConfig::new(email, password).with_debug(debug))
}

/// Log in and return the authenticated client
pub async fn login(config: &ClientConfig) -> Result<NikePlusClient> {
    eprintln!("Logging in...");
    NikePlusClient::connect(config).await
}

/// Execute the check command: log in and report the account
pub async fn check(config: &ClientConfig) -> Result<()> {
    let client = login(config).await?;

    println!("Status: Logged in");
    if let Some(screen_name) = client.screen_name() {
        println!("Screen name: {}", screen_name);
    }

    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Prompt for password without echoing
fn rpassword_prompt(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let password = rpassword::read_password()
        .map_err(|e| NikePlusError::Io(io::Error::new(io::ErrorKind::Other, e.to_string())))?;

    Ok(password)
}

use std::path::Path;

use anyhow::{Context, Result, bail};
use tokio::io::AsyncReadExt;

use crate::types::Email;

pub async fn read_email(path: Option<&Path>, demo: &str) -> Result<Email> {
    let body = match path {
        None => {
            tracing::info!("No --email-file provided. Using demo email");
            demo.to_string()
        }
        Some(p) if p.as_os_str() == "-" => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read email from stdin")?;
            buf
        }
        Some(p) => {
            tracing::info!("Loading email from file: {}", p.display());
            tokio::fs::read_to_string(p)
                .await
                .with_context(|| format!("failed to read email from {}", p.display()))?
        }
    };

    let email = Email::new(body);
    if email.is_blank() {
        bail!("email is empty");
    }
    Ok(email)
}

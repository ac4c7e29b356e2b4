//! Password prompting and strength validation, lifted from the teacher's
//! `cli/src/secure_storage.rs` free functions and kept at the CLI layer
//! since they're interactive/`anyhow`-flavored rather than engine logic.

use anyhow::{bail, Context, Result};

pub fn validate_password_strength(password: &str) -> Result<()> {
    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_numeric());

    if !has_upper || !has_lower || !has_digit {
        bail!("Password must contain uppercase, lowercase, and numeric characters");
    }

    Ok(())
}

pub fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt).context("failed to read password")
}

pub fn prompt_new_password(prompt: &str) -> Result<String> {
    let password = prompt_password(prompt)?;
    let confirm = prompt_password("Confirm password: ")?;

    if password != confirm {
        bail!("passwords do not match");
    }

    validate_password_strength(&password)?;

    Ok(password)
}

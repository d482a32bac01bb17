//! Auth command handlers: login, logout, whoami, and the registration flow.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use evcharge_core::auth::AuthManager;
use evcharge_core::enroll::{EnrollError, EnrollStep, Enrollment};
use evcharge_core::session::mask_token;

pub async fn login(auth: &AuthManager, email: &str, password: &str) -> Result<()> {
    let user = auth.login(email, password).await?;
    if user.is_admin {
        println!("Logged in as {} <{}> (admin)", user.name, user.email);
    } else {
        println!("Logged in as {} <{}>", user.name, user.email);
    }
    Ok(())
}

pub async fn logout(auth: &AuthManager) -> Result<()> {
    if auth.logout().await? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub async fn whoami(auth: &AuthManager, json: bool) -> Result<()> {
    let Some(user) = auth.current_user().await else {
        bail!("Not logged in");
    };
    if json {
        return super::print_json(&user);
    }
    println!("{} <{}>", user.name, user.email);
    if let Some(phone) = &user.phone {
        println!("Phone: {phone}");
    }
    if user.is_admin {
        println!("Role: {} (admin)", user.effective_role());
    } else {
        println!("Role: {}", user.effective_role());
    }
    let session = auth.session().await;
    if let Some(token) = session.token() {
        println!("Token: {}", mask_token(token));
    }
    Ok(())
}

/// Runs the three-step registration flow interactively.
///
/// Flag values seed the first identity attempt; every retry prompts. At the
/// OTP prompt, `r` requests a fresh code and `b` returns to the identity
/// step with the previous answers prefilled. Validation and API failures
/// print and re-prompt at the same step, matching the form they replace.
pub async fn register(
    auth: &AuthManager,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
) -> Result<()> {
    let mut enrollment = Enrollment::new(auth.client().clone());
    let mut seeded = (name, email, phone);

    loop {
        match enrollment.step() {
            EnrollStep::CollectIdentity => {
                let draft = enrollment.identity().cloned();
                let name = match seeded.0.take() {
                    Some(value) => value,
                    None => prompt_or_draft("Full name", draft.as_ref().map(|d| d.name.as_str()))?,
                };
                let email = match seeded.1.take() {
                    Some(value) => value,
                    None => prompt_or_draft("Email", draft.as_ref().map(|d| d.email.as_str()))?,
                };
                let phone = match seeded.2.take() {
                    Some(value) => value,
                    None => {
                        prompt_or_draft("Phone number", draft.as_ref().map(|d| d.phone.as_str()))?
                    }
                };
                match enrollment.submit_identity(&name, &email, &phone).await {
                    Ok(message) => println!("{message}"),
                    Err(err @ EnrollError::Storage(_)) => return Err(err.into()),
                    Err(err) => eprintln!("{err}"),
                }
            }
            EnrollStep::AwaitCode => {
                let entry = prompt("OTP (r to resend, b to go back)")?;
                match entry.as_str() {
                    "r" => match enrollment.resend_code().await {
                        Ok(message) => println!("{message}"),
                        Err(err) => eprintln!("{err}"),
                    },
                    "b" => {
                        enrollment.back();
                    }
                    _ => match enrollment.submit_code(&entry).await {
                        Ok(message) => println!("{message}"),
                        Err(err) => eprintln!("{err}"),
                    },
                }
            }
            EnrollStep::SetPassword => {
                let password = prompt("Password (min 6 characters)")?;
                let confirm = prompt("Confirm password")?;
                match enrollment.submit_password(&password, &confirm).await {
                    Ok(grant) => {
                        if let Some(message) = &grant.message {
                            println!("{message}");
                        }
                        println!("Logged in as {} <{}>", grant.user.name, grant.user.email);
                    }
                    Err(err @ EnrollError::Storage(_)) => return Err(err.into()),
                    Err(err) => eprintln!("{err}"),
                }
            }
            EnrollStep::Committed => return Ok(()),
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush().context("flush stdout")?;
    let mut line = String::new();
    let read = io::stdin().read_line(&mut line).context("read input")?;
    if read == 0 {
        bail!("Input ended before registration completed");
    }
    Ok(line.trim().to_string())
}

/// Prompts with the previous answer as the default; an empty entry keeps it.
fn prompt_or_draft(label: &str, draft: Option<&str>) -> Result<String> {
    let Some(previous) = draft else {
        return prompt(label);
    };
    let entered = prompt(&format!("{label} [{previous}]"))?;
    if entered.is_empty() {
        Ok(previous.to_string())
    } else {
        Ok(entered)
    }
}

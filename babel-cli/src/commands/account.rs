//! Login, registration, logout and account deletion.

use babel_api::{ACCOUNT_DELETED_MESSAGE, LOGGED_OUT_MESSAGE, LoginForm, RegisterForm};
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};

use super::describe_expiry;
use crate::context::Context;
use crate::error::CliResult;
use crate::output::{field, info, success};

fn prompt_text(theme: &ColorfulTheme, value: Option<String>, prompt: &str) -> CliResult<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .interact_text()?),
    }
}

fn prompt_password(theme: &ColorfulTheme, value: Option<String>, prompt: &str) -> CliResult<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Password::with_theme(theme).with_prompt(prompt).interact()?),
    }
}

pub async fn login(ctx: &Context, identity: Option<String>, password: Option<String>) -> CliResult<()> {
    let theme = ColorfulTheme::default();
    let identity = prompt_text(&theme, identity, "Username or email")?;
    let password = prompt_password(&theme, password, "Password")?;

    let session = ctx.client.login(&LoginForm::new(identity, password)).await?;

    success(if session.message.is_empty() {
        "Logged in"
    } else {
        session.message.as_str()
    });
    field(
        "Session expires",
        &describe_expiry(session.access_exp, chrono::Utc::now().timestamp()),
    );
    Ok(())
}

pub async fn register(
    ctx: &Context,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> CliResult<()> {
    let theme = ColorfulTheme::default();
    let username = prompt_text(&theme, username, "Username")?;
    let email = prompt_text(&theme, email, "Email")?;

    // Mirrors the confirm-password field of the sign-up form
    let (password, cpassword) = match password {
        Some(password) => (password.clone(), password),
        None => (
            Password::with_theme(&theme).with_prompt("Password").interact()?,
            Password::with_theme(&theme)
                .with_prompt("Confirm password")
                .interact()?,
        ),
    };

    let form = RegisterForm {
        username,
        email,
        password,
        cpassword,
    };
    let session = ctx.client.register(&form).await?;

    success(if session.message.is_empty() {
        "Account created"
    } else {
        session.message.as_str()
    });
    field(
        "Session expires",
        &describe_expiry(session.access_exp, chrono::Utc::now().timestamp()),
    );
    Ok(())
}

pub async fn logout(ctx: &Context) -> CliResult<()> {
    ctx.client.logout().await?;
    success(LOGGED_OUT_MESSAGE);
    Ok(())
}

pub async fn delete_account(
    ctx: &Context,
    password: Option<String>,
    confirm: Option<String>,
    yes: bool,
) -> CliResult<()> {
    let theme = ColorfulTheme::default();
    let password = prompt_password(&theme, password, "Enter password")?;
    let confirm = prompt_password(&theme, confirm, "Confirm password")?;

    if !yes
        && password == confirm
        && !Confirm::with_theme(&theme)
            .with_prompt("I am ready to delete my Babel account")
            .default(false)
            .interact()?
    {
        info("Cancelled");
        return Ok(());
    }

    ctx.client.delete_account(&password, &confirm).await?;
    success(ACCOUNT_DELETED_MESSAGE);
    Ok(())
}

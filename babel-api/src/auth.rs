//! Account handlers: login, registration, logout and deletion.

use babel_http_client::StatusCode;
use babel_log::{info, warn};
use babel_reauth::ExpiryGrant;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{error_message, json_body};
use crate::{ApiError, BabelClient, Result};

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const LOGOUT_PATH: &str = "/purge-family";
pub const DELETE_ACCOUNT_PATH: &str = "/delete-account";

pub const LOGGED_OUT_MESSAGE: &str = "You have logged out successfully";
pub const ACCOUNT_DELETED_MESSAGE: &str = "Account Deleted Successfully";

/// Login credentials. `identity` is a username or an email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub identity: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(identity: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            password: password.into(),
        }
    }
}

/// Registration form. `cpassword` is the confirmation entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub cpassword: String,
}

#[derive(Serialize)]
struct DeleteAccountBody<'a> {
    password: &'a str,
}

/// A freshly established session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Server message, empty when none was sent.
    pub message: String,
    pub access_exp: i64,
    pub leeway: i64,
}

impl BabelClient {
    /// Log in and store the session expiry.
    pub async fn login(&self, form: &LoginForm) -> Result<AuthSession> {
        self.authenticate(LOGIN_PATH, form).await
    }

    /// Register a new account and store the session expiry.
    pub async fn register(&self, form: &RegisterForm) -> Result<AuthSession> {
        self.authenticate(REGISTER_PATH, form).await
    }

    async fn authenticate<T: Serialize + Sync>(&self, path: &str, form: &T) -> Result<AuthSession> {
        let response = self
            .http()
            .post(self.config().auth_url(path))
            .json(form)
            .send()
            .await?;

        if !response.is_success() {
            let status = response.status().as_u16();
            let message = error_message(&response);
            warn!("{} refused: {} ({})", path, message, status);
            return Err(ApiError::Rejected { message, status });
        }

        let body = json_body(&response)?;
        let grant = ExpiryGrant::from_body(&body).ok_or_else(|| {
            ApiError::UnexpectedResponse("missing or unreadable access_exp".to_string())
        })?;

        self.store()
            .set_session_expiry(grant.access_exp, grant.leeway)
            .await?;
        info!("Session established, expires at {}", grant.access_exp);

        Ok(AuthSession {
            message: body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            access_exp: grant.access_exp,
            leeway: grant.leeway,
        })
    }

    /// End the session and wipe the stored credentials.
    pub async fn logout(&self) -> Result<()> {
        let response = self
            .http()
            .get(self.config().auth_url(LOGOUT_PATH))
            .send()
            .await?;

        if !response.is_success() {
            return Err(ApiError::status(response.status()));
        }

        self.store().clear_all().await?;
        info!("{}", LOGGED_OUT_MESSAGE);
        Ok(())
    }

    /// Delete the account after a local confirmation check.
    ///
    /// Nothing is sent when `password` and `confirm` differ.
    pub async fn delete_account(&self, password: &str, confirm: &str) -> Result<()> {
        if password != confirm {
            return Err(ApiError::PasswordMismatch);
        }

        let response = self
            .http()
            .delete(self.config().api_url(DELETE_ACCOUNT_PATH))
            .json(&DeleteAccountBody { password })
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::IncorrectPassword),
            status if !status.is_success() => Err(ApiError::status(status)),
            _ => {
                self.store().clear_all().await?;
                info!("{}", ACCOUNT_DELETED_MESSAGE);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_form_shape() {
        let body = json!(LoginForm::new("ada", "hunter2"));
        assert_eq!(body, json!({"identity": "ada", "password": "hunter2"}));
    }

    #[test]
    fn test_register_form_shape() {
        let form = RegisterForm {
            username: "ada".into(),
            email: "ada@example.com".into(),
            password: "pw".into(),
            cpassword: "pw".into(),
        };
        let body = json!(form);
        assert_eq!(body["cpassword"], "pw");
        assert_eq!(body.as_object().unwrap().len(), 4);
    }
}

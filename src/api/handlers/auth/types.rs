//! Request/response types for the login endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Shared login/signup form submission. A single endpoint serves both
/// actions; `intent` says which one the user asked for.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Checkbox; present (any value) when checked.
    pub remember: Option<String>,
    /// Hidden field carrying the post-login destination.
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
    pub intent: Option<String>,
}

/// Data for rendering the login page, including any error stashed in the
/// session by a failed login.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginPage {
    pub form_error: Option<String>,
}

/// Field-scoped errors for signup and invalid-intent failures.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct FormErrors {
    pub errors: FieldErrors,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
}

impl FormErrors {
    pub(crate) fn username(message: impl Into<String>) -> Self {
        Self {
            errors: FieldErrors {
                username: Some(message.into()),
                ..FieldErrors::default()
            },
        }
    }

    pub(crate) fn password(message: impl Into<String>) -> Self {
        Self {
            errors: FieldErrors {
                password: Some(message.into()),
                ..FieldErrors::default()
            },
        }
    }

    pub(crate) fn form(message: impl Into<String>) -> Self {
        Self {
            errors: FieldErrors {
                form: Some(message.into()),
                ..FieldErrors::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn login_form_accepts_camel_case_redirect_field() -> Result<()> {
        let form: LoginForm = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "password": "pw",
            "remember": "on",
            "redirectTo": "/notes",
            "intent": "login",
        }))?;
        assert_eq!(form.username.as_deref(), Some("alice"));
        assert_eq!(form.redirect_to.as_deref(), Some("/notes"));
        assert_eq!(form.remember.as_deref(), Some("on"));
        Ok(())
    }

    #[test]
    fn form_errors_skip_empty_fields() -> Result<()> {
        let value = serde_json::to_value(FormErrors::username("taken"))?;
        let errors = value.get("errors").context("missing errors object")?;
        assert_eq!(
            errors.get("username").and_then(serde_json::Value::as_str),
            Some("taken")
        );
        assert!(errors.get("password").is_none());
        assert!(errors.get("form").is_none());
        Ok(())
    }

    #[test]
    fn login_page_round_trips() -> Result<()> {
        let page = LoginPage {
            form_error: Some("Invalid Username or Password".to_string()),
        };
        let value = serde_json::to_value(&page)?;
        let decoded: LoginPage = serde_json::from_value(value)?;
        assert_eq!(
            decoded.form_error.as_deref(),
            Some("Invalid Username or Password")
        );
        Ok(())
    }
}

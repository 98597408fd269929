//! Login page and the shared login/signup form endpoint.
//!
//! One `POST /login` serves both actions, dispatched on the submitted
//! `intent` field. Login failures redirect back to the page with the error
//! stashed in the session; signup and intent failures answer with
//! field-scoped 400 JSON.

use axum::{
    Form, Json,
    extract::Extension,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{LOCATION, SET_COOKIE},
    },
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::{
    authenticator::Authenticator,
    error::AuthError,
    password::hash_password,
    session::{
        CommitOptions, REMEMBER_MAX_AGE_SECONDS, SESSION_KEY_ERROR, SESSION_KEY_TOKEN, Session,
    },
    state::AuthState,
    storage::{SignupOutcome, insert_user},
    types::{FormErrors, LoginForm, LoginPage},
    utils::{DEFAULT_REDIRECT, safe_redirect, valid_username},
};

const LOGIN_PATH: &str = "/login";

const INTENT_LOGIN: &str = "login";
const INTENT_SIGNUP: &str = "signup";

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login page data, with any pending form error", body = LoginPage),
        (status = 302, description = "Already authenticated; redirected to /")
    ),
    tag = "auth"
)]
pub async fn login_page(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> Response {
    let mut session = auth_state.sessions().load(&headers);

    // Authenticated users have nothing to do here.
    if session.get(SESSION_KEY_TOKEN).is_some() {
        return redirect(DEFAULT_REDIRECT, None);
    }

    // The error is one-shot: taking it and committing consumes it.
    let form_error = session.take(SESSION_KEY_ERROR);
    match auth_state
        .sessions()
        .commit(&session, CommitOptions::default())
    {
        Ok(cookie) => {
            let mut response_headers = HeaderMap::new();
            response_headers.insert(SET_COOKIE, cookie);
            (
                StatusCode::OK,
                response_headers,
                Json(LoginPage { form_error }),
            )
                .into_response()
        }
        Err(err) => {
            error!("failed to commit session: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginForm,
    responses(
        (status = 302, description = "Login or signup succeeded; session cookie set"),
        (status = 400, description = "Signup conflict, invalid field, or unknown intent", body = FormErrors)
    ),
    tag = "auth"
)]
pub async fn submit(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    authenticator: Extension<Arc<Authenticator>>,
    Form(form): Form<LoginForm>,
) -> Response {
    let redirect_to = safe_redirect(form.redirect_to.as_deref(), DEFAULT_REDIRECT);
    let remember = form.remember.is_some();
    let username = form.username.unwrap_or_default();
    let password = form.password.unwrap_or_default();

    match form.intent.as_deref() {
        Some(INTENT_LOGIN) => {
            login(
                &headers,
                &pool,
                &auth_state,
                &authenticator,
                &username,
                &password,
                remember,
                &redirect_to,
            )
            .await
        }
        Some(INTENT_SIGNUP) => {
            signup(
                &headers,
                &pool,
                &auth_state,
                &username,
                &password,
                &redirect_to,
            )
            .await
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(FormErrors::form(AuthError::InvalidIntent.to_string())),
        )
            .into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 302, description = "Session cleared; redirected to /login")
    ),
    tag = "auth"
)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> Response {
    // Always clear the cookie; logging out twice is fine.
    redirect(LOGIN_PATH, Some(auth_state.sessions().clear()))
}

#[allow(clippy::too_many_arguments)]
async fn login(
    headers: &HeaderMap,
    pool: &PgPool,
    auth_state: &AuthState,
    authenticator: &Authenticator,
    username: &str,
    password: &str,
    remember: bool,
    redirect_to: &str,
) -> Response {
    match authenticator.verify(pool, username, password).await {
        Ok(user_id) => {
            let mut session = auth_state.sessions().load(headers);
            session.set(SESSION_KEY_TOKEN, user_id.to_string());
            let options = CommitOptions {
                max_age: remember.then_some(REMEMBER_MAX_AGE_SECONDS),
            };
            commit_and_redirect(auth_state, &session, options, redirect_to)
        }
        Err(AuthError::Internal(err)) => {
            error!("login failed: {err:?}");
            internal_error()
        }
        Err(err) => {
            // Stash the failure for the next page load; no token is issued.
            let mut session = auth_state.sessions().load(headers);
            session.set(SESSION_KEY_ERROR, err.to_string());
            commit_and_redirect(auth_state, &session, CommitOptions::default(), LOGIN_PATH)
        }
    }
}

async fn signup(
    headers: &HeaderMap,
    pool: &PgPool,
    auth_state: &AuthState,
    username: &str,
    password: &str,
    redirect_to: &str,
) -> Response {
    if !valid_username(username) {
        return (
            StatusCode::BAD_REQUEST,
            Json(FormErrors::username("Invalid username")),
        )
            .into_response();
    }
    if password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(FormErrors::password("Password must not be empty")),
        )
            .into_response();
    }

    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("signup failed: {err:?}");
            return internal_error();
        }
    };

    match insert_user(pool, username, &password_hash).await {
        Ok(SignupOutcome::Created(user_id)) => {
            let mut session = auth_state.sessions().load(headers);
            session.set(SESSION_KEY_TOKEN, user_id.to_string());
            commit_and_redirect(auth_state, &session, CommitOptions::default(), redirect_to)
        }
        Ok(SignupOutcome::Conflict) => (
            StatusCode::BAD_REQUEST,
            Json(FormErrors::username(AuthError::DuplicateUser.to_string())),
        )
            .into_response(),
        Err(err) => {
            error!("signup failed: {err:?}");
            internal_error()
        }
    }
}

fn commit_and_redirect(
    auth_state: &AuthState,
    session: &Session,
    options: CommitOptions,
    location: &str,
) -> Response {
    match auth_state.sessions().commit(session, options) {
        Ok(cookie) => redirect(location, Some(cookie)),
        Err(err) => {
            error!("failed to commit session: {err}");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
}

fn redirect(location: &str, cookie: Option<HeaderValue>) -> Response {
    let mut headers = HeaderMap::new();
    if let Some(cookie) = cookie {
        headers.insert(SET_COOKIE, cookie);
    }
    let location = HeaderValue::from_str(location)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_REDIRECT));
    headers.insert(LOCATION, location);
    (StatusCode::FOUND, headers).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::state::AuthConfig;
    use anyhow::Result;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;

    // The dispatch arms under test decide before any query runs, so a lazy
    // pool that never connects is enough.
    async fn submit_form(form: LoginForm) -> Result<Response> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://unused@localhost:5432/unused")?;
        let auth_state = Arc::new(AuthState::new(AuthConfig::new(
            SecretString::from("0123456789abcdef0123456789abcdef".to_string()),
            "http://localhost:8080".to_string(),
        )));
        let authenticator = Arc::new(Authenticator::new());

        Ok(submit(
            HeaderMap::new(),
            Extension(pool),
            Extension(auth_state),
            Extension(authenticator),
            Form(form),
        )
        .await)
    }

    fn form_with_intent(intent: Option<&str>) -> LoginForm {
        LoginForm {
            username: Some("alice".to_string()),
            password: Some("pw".to_string()),
            remember: None,
            redirect_to: None,
            intent: intent.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn unknown_intent_answers_400_with_form_error() -> Result<()> {
        let response = submit_form(form_with_intent(Some("frobnicate"))).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert_eq!(value["errors"]["form"], "Invalid intent");
        Ok(())
    }

    #[tokio::test]
    async fn missing_intent_takes_the_invalid_intent_arm() -> Result<()> {
        let response = submit_form(form_with_intent(None)).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert_eq!(value["errors"]["form"], "Invalid intent");
        Ok(())
    }

    #[test]
    fn redirect_sets_location_and_cookie() {
        let cookie = HeaderValue::from_static("ensaluti_session=x; Path=/");
        let response = redirect("/notes", Some(cookie));
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/notes")
        );
        assert!(response.headers().get(SET_COOKIE).is_some());
    }

    #[test]
    fn redirect_without_cookie_leaves_session_alone() {
        let response = redirect("/", None);
        assert_eq!(response.status(), StatusCode::FOUND);
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[test]
    fn unparsable_location_falls_back_to_root() {
        let response = redirect("/bad\nlocation", None);
        assert_eq!(
            response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/")
        );
    }
}

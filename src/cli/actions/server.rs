use crate::api;
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub session_secret: SecretString,
    pub base_url: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database connection or server startup fails.
pub async fn execute(args: Args) -> Result<()> {
    let auth_config = api::handlers::auth::AuthConfig::new(args.session_secret, args.base_url);

    api::new(args.port, args.dsn, auth_config).await
}

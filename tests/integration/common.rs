use sflite::{ForceClient, PasswordCredentials};

/// Credentials from the environment, or `None` (with a note on stderr) when
/// the org is not configured.
pub fn credentials() -> Option<PasswordCredentials> {
    match PasswordCredentials::from_env() {
        Ok(creds) if !creds.username().is_empty() => Some(creds),
        _ => {
            eprintln!("skipping: SF_USER / SF_PASS not set");
            None
        }
    }
}

/// A logged-in client, or `None` when the org is not configured.
///
/// A configured org that rejects the login is a failure, not a skip.
pub async fn logged_in_client() -> Option<ForceClient> {
    let creds = credentials()?;
    let client = ForceClient::new(creds.login_url(), "", "").expect("client should build");
    client
        .login(&creds)
        .await
        .expect("login with SF_USER / SF_PASS / SF_TOKEN should succeed");
    Some(client)
}

/// Value of an optional test fixture variable.
pub fn fixture(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => {
            eprintln!("skipping: {name} not set");
            None
        }
    }
}

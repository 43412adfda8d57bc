//! Login integration tests.

use super::common::{credentials, logged_in_client};
use sflite::ForceClient;

#[tokio::test]
async fn test_login_password() {
    let Some(client) = logged_in_client().await else {
        return;
    };

    assert!(client.is_authenticated());
    assert!(client.session_id().is_some_and(|s| !s.is_empty()));
    assert!(client
        .instance_url()
        .is_some_and(|u| u.starts_with("https://")));

    let user = client.user().expect("login should record the user");
    assert!(!user.id.is_empty());
    assert!(!user.user_name.is_empty());
}

#[tokio::test]
async fn test_bad_login_leaves_client_unauthenticated() {
    let Some(creds) = credentials() else {
        return;
    };

    let client = ForceClient::new(creds.login_url(), "", "").unwrap();
    let result = client.login_password("bad", "bad", "bad").await;

    assert!(result.is_err());
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_injected_session_is_usable() {
    let Some(client) = logged_in_client().await else {
        return;
    };

    let other = ForceClient::new(client.base_url(), "", "").unwrap();
    other.set_session(
        client.session_id().unwrap(),
        client.instance_url().unwrap(),
    );

    let page = other.query("SELECT Id FROM User LIMIT 1").await.unwrap();
    assert!(page.total_size >= 1);
}

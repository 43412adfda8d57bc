//! Query and record integration tests.

use super::common::logged_in_client;
use sflite::rest::escape_soql_string;
use sflite::ForceClient;

#[tokio::test]
async fn test_calls_before_login_are_refused() {
    let client = ForceClient::new("", "", "").unwrap();

    let err = client.query("SELECT Id FROM Case LIMIT 1").await.unwrap_err();
    assert!(err.is_not_authenticated());

    let mut case = client.sobject("Case");
    case.set("Subject", "never sent");
    assert!(case.create().await.unwrap_err().is_not_authenticated());
}

#[tokio::test]
async fn test_query_cases() {
    let Some(client) = logged_in_client().await else {
        return;
    };

    let page = client.query("SELECT Id FROM Case LIMIT 1").await.unwrap();
    if page.total_size == 0 {
        eprintln!("skipping: org has no Case records");
        return;
    }
    for record in &page.records {
        assert_eq!(record.type_name(), "Case");
        assert!(!record.id().is_empty());
        assert!(record.is_attached());
    }
}

#[tokio::test]
async fn test_create_then_query_round_trip() {
    let Some(client) = logged_in_client().await else {
        return;
    };

    let subject = format!("sflite round trip {}", std::process::id());
    let mut case = client.sobject("Case");
    case.set("Subject", subject.as_str());
    case.create().await.unwrap();
    let id = case.id().to_string();
    assert!(!id.is_empty());

    let page = client
        .query(&format!(
            "SELECT Id, Subject FROM Case WHERE Id = '{}'",
            escape_soql_string(&id)
        ))
        .await
        .unwrap();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].string_field("Subject"), subject);

    page.records[0].delete().await.unwrap();
}

#[tokio::test]
async fn test_relationship_field_without_extra_request() {
    let Some(client) = logged_in_client().await else {
        return;
    };

    let page = client
        .query("SELECT Id, Owner.Name FROM Account WHERE OwnerId != null LIMIT 1")
        .await
        .unwrap();
    if let Some(account) = page.records.first() {
        let owner = account.sobject_field("User", "Owner").unwrap();
        assert!(!owner.string_field("Name").is_empty());
        assert!(owner.is_attached());
    }
}

#[tokio::test]
async fn test_describe_global() {
    let Some(client) = logged_in_client().await else {
        return;
    };

    let result = client.describe_global().await.unwrap();
    assert!(result.find("Account").is_some());
}

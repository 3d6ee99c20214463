use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::{jonh_json, subscriber_from, TestApp};

#[tokio::test]
async fn api_subscription_write_and_get_ok() -> Result<()> {
    let app = TestApp::spawn().await?;
    let expected = subscriber_from_json(jonh_json())?;

    let res = app.post_subscription(&jonh_json()).await?;
    assert_eq!(
        res.status(),
        StatusCode::CREATED,
        "Wrong response StatusCode: {}",
        res.status()
    );
    assert_eq!(subscriber_from(res).await?, expected);

    let res = app.get_subscription("jonh@gmail.com").await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, jonh_json());

    Ok(())
}

#[tokio::test]
async fn api_subscription_persists_record_file() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.post_subscription(&jonh_json()).await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let content = std::fs::read(app.storage_dir.join("jonh@gmail.com"))?;
    let stored: Value = serde_json::from_slice(&content)?;
    assert_eq!(stored, jonh_json());

    Ok(())
}

#[tokio::test]
async fn api_subscription_duplicate_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.post_subscription(&jonh_json()).await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let mut other = jonh_json();
    other["newsletterId"] = json!("another-campaign");
    let res = app.post_subscription(&other).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.bytes().await?.is_empty(), "no record should be returned");

    // The first record is untouched.
    let res = app.get_subscription("jonh@gmail.com").await?;
    let body: Value = res.json().await?;
    assert_eq!(body["newsletterId"], "fdsavdsasdsda");

    Ok(())
}

#[tokio::test]
async fn api_subscription_unknown_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let tests = ["jonh@gmail.com", "not-an-email", "..%2Fconfig"];

    for email in tests {
        let res = app.get_subscription(email).await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "for: {email}");
        assert!(res.bytes().await?.is_empty());
    }

    Ok(())
}

#[tokio::test]
async fn api_subscription_corrupt_record_404() -> Result<()> {
    let app = TestApp::spawn().await?;
    std::fs::create_dir_all(&app.storage_dir)?;
    std::fs::write(app.storage_dir.join("jonh@gmail.com"), b"{\"email\": \"jo")?;

    let res = app.get_subscription("jonh@gmail.com").await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn api_subscription_invalid_record_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    let mut tests = Vec::new();
    for field in ["email", "firstName", "gender", "birthDay", "consent", "newsletterId"] {
        let mut body = jonh_json();
        body.as_object_mut()
            .expect("json object")
            .remove(field);
        tests.push((body, format!("Missing {field}")));
    }
    let mut body = jonh_json();
    body["email"] = json!("jonh@com");
    tests.push((body, "Invalid email".to_string()));
    let mut body = jonh_json();
    body["birthDay"] = json!("2000-13-45");
    tests.push((body, "Invalid birthDay".to_string()));
    let mut body = jonh_json();
    body["birthDay"] = json!("2000-1-5");
    tests.push((body, "Unpadded birthDay".to_string()));
    let mut body = jonh_json();
    body["email"] = json!(format!("{}@example.com", "a".repeat(300)));
    tests.push((body, "Over-long email".to_string()));
    tests.push((json!({}), "Empty json".to_string()));
    tests.push((json!([1, 2, 3]), "Not an object".to_string()));

    for (json_request, params) in tests {
        let res = app.post_subscription(&json_request).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "Wrong response: ({}), Expected: ({}); for request with: {params}",
            res.status(),
            StatusCode::BAD_REQUEST
        );
    }

    let res = app.post_raw_subscription("{\"email\": ").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST, "malformed json");

    // Nothing got stored.
    let res = app.get_subscription("jonh@gmail.com").await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn api_subscription_overlong_email_400() -> Result<()> {
    let app = TestApp::spawn().await?;
    let email = format!("{}@example.com", "a".repeat(300));

    let mut body = jonh_json();
    body["email"] = json!(email);
    let res = app.post_subscription(&body).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.get_subscription(&email).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn api_subscription_update_and_delete_501() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.put_subscription(&jonh_json()).await?;
    assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);

    let res = app.delete_subscription("jonh@gmail.com").await?;
    assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);

    Ok(())
}

#[tokio::test]
async fn api_subscription_concurrent_posts_single_winner() -> Result<()> {
    let app = TestApp::spawn().await?;

    let mut set = tokio::task::JoinSet::new();
    for i in 0..8 {
        let mut body = jonh_json();
        body["newsletterId"] = json!(format!("campaign-{i}"));
        let client = app.http_client.clone();
        let url = format!("http://{}/api/subscription", app.addr);
        set.spawn(async move { client.post(url).json(&body).send().await });
    }

    let mut created = 0;
    while let Some(res) = set.join_next().await {
        match res??.status() {
            StatusCode::CREATED => created += 1,
            StatusCode::BAD_REQUEST => {}
            other => panic!("unexpected status: {other}"),
        }
    }
    assert_eq!(created, 1);

    Ok(())
}

fn subscriber_from_json(value: Value) -> Result<substore::model::Subscriber> {
    let record: substore::model::DeserSubscriber = serde_json::from_value(value)?;
    Ok(substore::model::Subscriber::try_from(record)?)
}

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{read, TestServer};

async fn create_profile(server: &TestServer, token: &str) -> Result<Value> {
    let res = server
        .post(
            token,
            "/api/profile",
            json!({
                "status": "Developer",
                "skills": "rust, sql, axum",
                "githubusername": "ann",
                "twitter": "https://twitter.com/ann"
            }),
        )
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["data"].clone())
}

#[tokio::test]
async fn upsert_creates_then_updates_profile() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ann").await?;

    let (status, _) = read(server.get(&token, "/api/profile/me").await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let created = create_profile(&server, &token).await?;
    assert_eq!(created["skills"], json!(["rust", "sql", "axum"]));
    assert_eq!(created["social"]["twitter"], "https://twitter.com/ann");

    let res = server
        .post(&token, "/api/profile", json!({ "status": "Lead", "skills": "go" }))
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], created["id"]);
    assert_eq!(body["data"]["status"], "Lead");
    assert_eq!(body["data"]["social"], json!({}));

    let (status, body) = read(server.get(&token, "/api/profile/me").await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["name"], "Ann");
    Ok(())
}

#[tokio::test]
async fn profile_requires_status_and_skills() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ann").await?;

    let (status, body) = read(server.post(&token, "/api/profile", json!({})).await?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"].get("status").is_some());
    assert!(body["field_errors"].get("skills").is_some());
    Ok(())
}

#[tokio::test]
async fn experience_entries_are_added_newest_first_and_removed_by_id() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ann").await?;
    create_profile(&server, &token).await?;

    for title in ["Junior", "Senior"] {
        let res = server
            .put(
                &token,
                "/api/profile/experience",
                json!({ "title": title, "company": "Acme", "from": "2019-01-01" }),
            )
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let (_, body) = read(server.get(&token, "/api/profile/me").await?).await?;
    let experience = body["data"]["experience"].as_array().cloned().unwrap_or_default();
    assert_eq!(experience.len(), 2);
    assert_eq!(experience[0]["title"], "Senior");

    // Unknown ids must not remove anything
    let res = server.delete(&token, "/api/profile/experience/missing").await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Experience does not exist");

    let senior = experience[0]["id"].as_str().unwrap_or_default();
    let res = server.delete(&token, &format!("/api/profile/experience/{}", senior)).await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, StatusCode::OK);
    let remaining = body["data"]["experience"].as_array().cloned().unwrap_or_default();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["title"], "Junior");
    Ok(())
}

#[tokio::test]
async fn education_entries_round_trip() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ann").await?;
    create_profile(&server, &token).await?;

    let res = server
        .put(
            &token,
            "/api/profile/education",
            json!({
                "school": "State U",
                "degree": "BSc",
                "fieldofstudy": "CS",
                "from": "2010-09-01",
                "to": "2014-06-01"
            }),
        )
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, StatusCode::OK);
    let entry = &body["data"]["education"][0];
    assert_eq!(entry["to"], "2014-06-01");

    let edu_id = entry["id"].as_str().unwrap_or_default().to_string();
    let res = server.delete(&token, &format!("/api/profile/education/{}", edu_id)).await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["education"], json!([]));

    let res = server.delete(&token, &format!("/api/profile/education/{}", edu_id)).await?;
    let (status, _) = read(res).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn public_profile_listing_and_lookup() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ann").await?;
    let ann_id = server.user_id(&token).await?;
    create_profile(&server, &token).await?;

    let (status, body) = read(server.client.get(server.url("/api/profile")).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["user"]["id"], ann_id.as_str());

    let url = server.url(&format!("/api/profile/user/{}", ann_id));
    let (status, body) = read(server.client.get(url).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Developer");

    let res = server.client.get(server.url("/api/profile/user/nobody")).send().await?;
    let (status, _) = read(res).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unreachable_github_is_a_gateway_error() -> Result<()> {
    let server = TestServer::spawn().await?;
    let res = server.client.get(server.url("/api/profile/github/octocat")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    Ok(())
}

#[tokio::test]
async fn deleting_account_removes_profile_posts_and_user() -> Result<()> {
    let server = TestServer::spawn().await?;
    let ann = server.register("Ann").await?;
    let bob = server.register("Bob").await?;
    let ann_id = server.user_id(&ann).await?;
    create_profile(&server, &ann).await?;
    server.post(&ann, "/api/posts", json!({ "text": "hello" })).await?;
    server.post(&bob, "/api/posts", json!({ "text": "bob here" })).await?;

    let (status, body) = read(server.delete(&ann, "/api/profile").await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["msg"], "User deleted");

    let url = server.url(&format!("/api/profile/user/{}", ann_id));
    assert_eq!(server.client.get(url).send().await?.status(), StatusCode::NOT_FOUND);

    let (_, body) = read(server.get(&bob, "/api/posts").await?).await?;
    let posts = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["text"], "bob here");

    // The token still verifies but the account is gone
    assert_eq!(server.get(&ann, "/api/auth").await?.status(), StatusCode::NOT_FOUND);
    Ok(())
}

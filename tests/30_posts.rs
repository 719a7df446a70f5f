mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{read, TestServer};

async fn create_post(server: &TestServer, token: &str, text: &str) -> Result<String> {
    let res = server.post(token, "/api/posts", json!({ "text": text })).await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(body["data"]["id"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn posts_carry_author_details_and_list_newest_first() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ann").await?;

    create_post(&server, &token, "first").await?;
    let second = create_post(&server, &token, "second").await?;

    let (status, body) = read(server.get(&token, "/api/posts").await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], second.as_str());
    assert_eq!(body["data"][0]["name"], "Ann");

    let (status, body) = read(server.get(&token, &format!("/api/posts/{}", second)).await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["text"], "second");

    let (status, body) = read(server.get(&token, "/api/posts/does-not-exist").await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Post not found");
    Ok(())
}

#[tokio::test]
async fn empty_post_text_is_rejected() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ann").await?;

    let res = server.post(&token, "/api/posts", json!({ "text": "  " })).await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["text"], "Text is required");
    Ok(())
}

#[tokio::test]
async fn like_twice_then_unlike_twice() -> Result<()> {
    let server = TestServer::spawn().await?;
    let ann = server.register("Ann").await?;
    let bob = server.register("Bob").await?;
    let bob_id = server.user_id(&bob).await?;
    let post = create_post(&server, &ann, "like me").await?;
    let like_path = format!("/api/posts/like/{}", post);
    let unlike_path = format!("/api/posts/unlike/{}", post);

    let (status, body) = read(server.put(&bob, &like_path, json!({})).await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([{ "user": bob_id }]));

    let (status, body) = read(server.put(&bob, &like_path, json!({})).await?).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Post already liked");

    let (status, body) = read(server.put(&bob, &unlike_path, json!({})).await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = read(server.put(&bob, &unlike_path, json!({})).await?).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Post has not yet been liked");
    Ok(())
}

#[tokio::test]
async fn only_the_author_deletes_a_post() -> Result<()> {
    let server = TestServer::spawn().await?;
    let ann = server.register("Ann").await?;
    let bob = server.register("Bob").await?;
    let post = create_post(&server, &ann, "mine").await?;
    let path = format!("/api/posts/{}", post);

    let (status, body) = read(server.delete(&bob, &path).await?).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "User not authorized");

    let (status, body) = read(server.delete(&ann, &path).await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["msg"], "Post removed");

    assert_eq!(server.get(&ann, &path).await?.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn comments_are_removed_only_by_their_author() -> Result<()> {
    let server = TestServer::spawn().await?;
    let ann = server.register("Ann").await?;
    let bob = server.register("Bob").await?;
    let post = create_post(&server, &ann, "discuss").await?;

    let res = server
        .post(&bob, &format!("/api/posts/comment/{}", post), json!({ "text": "first!" }))
        .await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"][0]["name"], "Bob");
    let comment = body["data"][0]["id"].as_str().unwrap_or_default().to_string();
    let path = format!("/api/posts/comment/{}/{}", post, comment);

    // The post's author cannot remove someone else's comment
    let (status, _) = read(server.delete(&ann, &path).await?).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let res = server.delete(&ann, &format!("/api/posts/comment/{}/nope", post)).await?;
    let (status, body) = read(res).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Comment does not exist");

    let (status, body) = read(server.delete(&bob, &path).await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    Ok(())
}

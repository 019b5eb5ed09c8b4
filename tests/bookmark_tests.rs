// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bookmark add/remove/list through the HTTP API.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_test_app, register, request, seed_article, send};

#[tokio::test]
async fn test_add_duplicate_remove_list() {
    let app = create_test_app();
    let (token, _) = register(&app, "Rohan", "rohan@example.com", "secret1").await;
    seed_article(&app, "a1").await;

    let (status, body) =
        send(&app.router, request("POST", "/api/bookmarks/a1", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["a1"]));

    let (status, body) =
        send(&app.router, request("POST", "/api/bookmarks/a1", Some(&token), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already_bookmarked");

    let (status, body) = send(
        &app.router,
        request("GET", "/api/bookmarks/check/a1", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isBookmarked"], true);

    let (status, body) =
        send(&app.router, request("DELETE", "/api/bookmarks/a1", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) =
        send(&app.router, request("GET", "/api/bookmarks", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_remove_absent_bookmark_is_idempotent() {
    let app = create_test_app();
    let (token, _) = register(&app, "Rohan", "rohan@example.com", "secret1").await;
    seed_article(&app, "a1").await;
    send(&app.router, request("POST", "/api/bookmarks/a1", Some(&token), None)).await;

    for _ in 0..2 {
        let (status, body) = send(
            &app.router,
            request("DELETE", "/api/bookmarks/never-added", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!(["a1"]));
    }
}

#[tokio::test]
async fn test_bookmark_unknown_article() {
    let app = create_test_app();
    let (token, id) = register(&app, "Rohan", "rohan@example.com", "secret1").await;

    let (status, body) = send(
        &app.router,
        request("POST", "/api/bookmarks/does-not-exist", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "article_not_found");

    let identity = app
        .state
        .stores
        .identities
        .find_by_id(&id)
        .await
        .unwrap()
        .unwrap();
    assert!(identity.bookmarks.is_empty());
}

#[tokio::test]
async fn test_list_resolves_articles_and_skips_deleted() {
    let app = create_test_app();
    let (token, _) = register(&app, "Rohan", "rohan@example.com", "secret1").await;
    for id in ["a1", "a2", "a3"] {
        seed_article(&app, id).await;
        send(
            &app.router,
            request("POST", &format!("/api/bookmarks/{}", id), Some(&token), None),
        )
        .await;
    }

    app.state.stores.articles.delete("a2").await.unwrap();

    let (status, body) =
        send(&app.router, request("GET", "/api/bookmarks", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    let ids: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["a1", "a3"]);

    // Membership still reports the dangling ID.
    let (_, body) = send(
        &app.router,
        request("GET", "/api/bookmarks/check/a2", Some(&token), None),
    )
    .await;
    assert_eq!(body["data"]["isBookmarked"], true);
}

#[tokio::test]
async fn test_bookmarks_are_per_identity() {
    let app = create_test_app();
    let (alice, _) = register(&app, "Alice", "alice@example.com", "secret1").await;
    let (bob, _) = register(&app, "Bob Singh", "bob@example.com", "secret1").await;
    seed_article(&app, "a1").await;

    send(&app.router, request("POST", "/api/bookmarks/a1", Some(&alice), None)).await;

    let (_, body) = send(
        &app.router,
        request("GET", "/api/bookmarks/check/a1", Some(&bob), None),
    )
    .await;
    assert_eq!(body["data"]["isBookmarked"], false);
}

#[tokio::test]
async fn test_bookmarks_require_authentication() {
    let app = create_test_app();
    seed_article(&app, "a1").await;

    for (method, uri) in [
        ("GET", "/api/bookmarks"),
        ("POST", "/api/bookmarks/a1"),
        ("DELETE", "/api/bookmarks/a1"),
        ("GET", "/api/bookmarks/check/a1"),
    ] {
        let (status, body) = send(&app.router, request(method, uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["error"], "missing_token");
    }
}

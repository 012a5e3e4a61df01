mod common;

use axum::http::StatusCode;
use common::setup;
use serde_json::json;

#[tokio::test]
async fn test_category_lifecycle() {
    let app = setup().await;
    let (token, _) = app.register("root").await;

    let empty = app.get("/api/categories").await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["count"], 0);

    let created = app
        .send(
            "POST",
            "/api/categories",
            Some(json!({ "id": "music", "name": "Music", "icon": "Music" })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let category = &created.body["data"];
    assert_eq!(category["id"], "music");
    assert_eq!(category["icon"], "Music");
    assert_eq!(category["iconSize"], 24);
    assert_eq!(category["isActive"], true);
    assert!(category["_id"].is_string());

    let fetched = app.get("/api/categories/music").await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["name"], "Music");

    let updated = app
        .send(
            "PUT",
            "/api/categories/music",
            Some(json!({ "name": "Music & Dance", "icon": "Sparkles", "iconSize": 32 })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["name"], "Music & Dance");
    assert_eq!(updated.body["data"]["icon"], "Sparkles");
    assert_eq!(updated.body["data"]["iconSize"], 32);

    let deleted = app
        .send("DELETE", "/api/categories/music", None, Some(&token))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let gone = app.get("/api/categories/music").await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["error"], "Category not found");
}

#[tokio::test]
async fn test_any_signed_in_user_can_manage_categories() {
    let app = setup().await;
    app.register("root").await;
    let (maya, _) = app.register("maya").await;
    let (leo, _) = app.register("leo").await;

    let anonymous = app
        .send("POST", "/api/categories", Some(json!({ "id": "food", "name": "Food" })), None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["error"], "Not authorized to access this route");

    let created = app
        .send(
            "POST",
            "/api/categories",
            Some(json!({ "id": "food", "name": "Food" })),
            Some(&maya),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let anonymous_update = app
        .send("PUT", "/api/categories/food", Some(json!({ "name": "Eats" })), None)
        .await;
    assert_eq!(anonymous_update.status, StatusCode::UNAUTHORIZED);

    let update = app
        .send("PUT", "/api/categories/food", Some(json!({ "name": "Eats" })), Some(&leo))
        .await;
    assert_eq!(update.status, StatusCode::OK);
    assert_eq!(update.body["data"]["name"], "Eats");

    let anonymous_delete = app.send("DELETE", "/api/categories/food", None, None).await;
    assert_eq!(anonymous_delete.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.get("/api/categories/food").await.status, StatusCode::OK);

    let delete = app
        .send("DELETE", "/api/categories/food", None, Some(&leo))
        .await;
    assert_eq!(delete.status, StatusCode::OK);
    assert_eq!(app.get("/api/categories/food").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_category_validation() {
    let app = setup().await;
    let (token, _) = app.register("root").await;

    let missing = app
        .send("POST", "/api/categories", Some(json!({ "id": "food" })), Some(&token))
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let bad_icon = app
        .send(
            "POST",
            "/api/categories",
            Some(json!({ "id": "food", "name": "Food", "icon": "Skull" })),
            Some(&token),
        )
        .await;
    assert_eq!(bad_icon.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_icon.body["error"], "Unknown icon: Skull");

    let defaults = app
        .send(
            "POST",
            "/api/categories",
            Some(json!({ "id": "food", "name": "Food" })),
            Some(&token),
        )
        .await;
    assert_eq!(defaults.status, StatusCode::CREATED);
    assert_eq!(defaults.body["data"]["icon"], "Hash");

    let duplicate = app
        .send(
            "POST",
            "/api/categories",
            Some(json!({ "id": "food", "name": "More food" })),
            Some(&token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);

    let bad_update = app
        .send(
            "PUT",
            "/api/categories/food",
            Some(json!({ "icon": "Skull" })),
            Some(&token),
        )
        .await;
    assert_eq!(bad_update.status, StatusCode::BAD_REQUEST);

    let unknown = app
        .send("PUT", "/api/categories/nope", Some(json!({ "name": "x" })), Some(&token))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_hides_inactive_and_sorts_by_name() {
    let app = setup().await;
    let (token, _) = app.register("root").await;

    for (id, name, active) in [
        ("travel", "Travel", true),
        ("art", "Art", true),
        ("retro", "Retro", false),
    ] {
        let res = app
            .send(
                "POST",
                "/api/categories",
                Some(json!({ "id": id, "name": name, "isActive": active })),
                Some(&token),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    let names = |body: &serde_json::Value| -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect()
    };

    let active = app.get("/api/categories").await;
    assert_eq!(names(&active.body), vec!["Art", "Travel"]);

    let all = app.get("/api/categories?includeInactive=true").await;
    assert_eq!(names(&all.body), vec!["Art", "Retro", "Travel"]);
}

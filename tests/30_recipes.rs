mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

/// Register a fresh user and return (email, token)
async fn login_fresh_user(base_url: &str, prefix: &str) -> Result<(String, String)> {
    let client = reqwest::Client::new();
    let email = common::unique_email(prefix);

    let res = client
        .post(format!("{}/users", base_url))
        .json(&json!({ "email": email, "name": "test user", "password": "test123" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "registration failed");

    let res = client
        .post(format!("{}/login", base_url))
        .json(&json!({ "email": email, "password": "test123" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed");

    let body = res.json::<serde_json::Value>().await?;
    let token = body["token"].as_str().expect("token missing").to_string();
    Ok((email, token))
}

#[tokio::test]
async fn list_recipes_is_public_and_an_array() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/recipes", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body.is_array(), "expected array, got: {}", body);

    Ok(())
}

#[tokio::test]
async fn id_format_and_not_found_are_distinct() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/recipes/bad-id", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Wrong id format");

    let res = client
        .get(format!(
            "{}/recipes/ffffffffffffffffffffffff",
            server.base_url
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "recipe not found");

    Ok(())
}

#[tokio::test]
async fn mutations_require_a_token() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/recipes", server.base_url))
        .json(&json!({ "name": "chicken stew", "ingredients": "chicken", "preparation": "stew it" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "missing auth token");

    Ok(())
}

#[tokio::test]
async fn crud_flow_enforces_ownership() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_, owner_token) = login_fresh_user(&server.base_url, "owner").await?;
    let (_, other_token) = login_fresh_user(&server.base_url, "other").await?;

    // Owner creates a recipe
    let res = client
        .post(format!("{}/recipes", server.base_url))
        .header("authorization", &owner_token)
        .json(&json!({ "name": "chicken stew", "ingredients": "chicken, water", "preparation": "simmer" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let recipe_id = body["recipe"]["_id"].as_str().expect("_id missing").to_string();

    // Reads are public and repeatable
    for _ in 0..2 {
        let res = client
            .get(format!("{}/recipes/{}", server.base_url, recipe_id))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["name"], "chicken stew");
    }

    // A different verified identity gets the ownership-denial error
    let res = client
        .put(format!("{}/recipes/{}", server.base_url, recipe_id))
        .header("authorization", &other_token)
        .json(&json!({ "name": "stolen stew", "ingredients": "chicken", "preparation": "simmer" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "jwt malformed");

    // The owner may edit
    let res = client
        .put(format!("{}/recipes/{}", server.base_url, recipe_id))
        .header("authorization", &owner_token)
        .json(&json!({ "name": "rabbit stew", "ingredients": "rabbit, water", "preparation": "simmer longer" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "rabbit stew");

    // Only the owner (or an admin) may delete
    let res = client
        .delete(format!("{}/recipes/{}", server.base_url, recipe_id))
        .header("authorization", &other_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .delete(format!("{}/recipes/{}", server.base_url, recipe_id))
        .header("authorization", &owner_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/recipes/{}", server.base_url, recipe_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn image_round_trip() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_, token) = login_fresh_user(&server.base_url, "image").await?;

    let res = client
        .post(format!("{}/recipes", server.base_url))
        .header("authorization", &token)
        .json(&json!({ "name": "bread loaf", "ingredients": "flour, water", "preparation": "bake" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let recipe_id = body["recipe"]["_id"].as_str().expect("_id missing").to_string();

    // Before a blob is attached the image route is a 404
    let res = client
        .get(format!("{}/images/{}.jpeg", server.base_url, recipe_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "image not found");

    let jpeg_bytes: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, 0x4a, 0x46, 0x49, 0x46];
    let part = reqwest::multipart::Part::bytes(jpeg_bytes.to_vec())
        .file_name("bread.jpeg")
        .mime_str("image/jpeg")?;
    let form = reqwest::multipart::Form::new().part("image", part);

    let res = client
        .put(format!("{}/recipes/{}/image", server.base_url, recipe_id))
        .header("authorization", &token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let image_url = body["image"].as_str().expect("image url missing");
    assert!(
        image_url.ends_with(&format!("/images/{}.jpeg", recipe_id)),
        "unexpected image url: {}",
        image_url
    );

    let res = client
        .get(format!("{}/images/{}.jpeg", server.base_url, recipe_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let served = res.bytes().await?;
    assert_eq!(&served[..], jpeg_bytes);

    Ok(())
}

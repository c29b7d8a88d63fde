mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use common::{TestApp, JO_EMAIL, JO_PASSWORD};
use serde_json::json;

const JO: Option<(&str, &str)> = Some((JO_EMAIL, JO_PASSWORD));

#[tokio::test]
async fn list_is_empty_array_initially() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/api/courses", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()?, json!([]));
    Ok(())
}

#[tokio::test]
async fn list_embeds_owner_summary_only() -> Result<()> {
    let app = TestApp::new();
    let owner = app.register_jo().await?;
    app.create_course("Build a Basic Bookcase", owner).await?;
    app.create_course("Learn How to Program", owner).await?;

    let courses = app.get("/api/courses", None).await?.json()?;
    let courses = courses.as_array().expect("array");
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0]["title"], "Build a Basic Bookcase");

    for course in courses {
        assert_eq!(course["userId"], owner);
        let owner_obj = course["owner"].as_object().expect("owner object");
        let mut keys: Vec<&str> = owner_obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["emailAddress", "firstName", "id", "lastName"]);
    }
    Ok(())
}

#[tokio::test]
async fn create_returns_location_and_get_returns_full_owner() -> Result<()> {
    let app = TestApp::new();
    let owner = app.register_jo().await?;

    let res = app
        .request(
            Method::POST,
            "/api/courses",
            JO,
            Some(json!({ "title": "Build a Basic Bookcase", "description": "Dream furniture.", "userId": owner })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert!(res.body.is_empty());
    let location = res.location().expect("Location header").to_string();
    assert!(location.starts_with("courses/"));

    let course = app.get(&format!("/api/{}", location), None).await?;
    assert_eq!(course.status, StatusCode::OK);
    let course = course.json()?;
    assert_eq!(course["title"], "Build a Basic Bookcase");
    assert_eq!(course["description"], "Dream furniture.");
    assert_eq!(course["owner"]["id"], owner);
    assert_eq!(course["owner"]["emailAddress"], JO_EMAIL);
    assert!(course["owner"].get("createdAt").is_some());
    assert!(course["owner"].get("passwordHash").is_none());
    assert!(course["owner"].get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn create_with_unknown_owner_is_400() -> Result<()> {
    let app = TestApp::new();
    app.register_jo().await?;

    let res = app
        .request(
            Method::POST,
            "/api/courses",
            JO,
            Some(json!({ "title": "Orphan", "description": "No owner.", "userId": 9999 })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()?, json!({ "errors": ["The course owner does not exist"] }));
    Ok(())
}

#[tokio::test]
async fn create_with_missing_fields_is_400() -> Result<()> {
    let app = TestApp::new();
    app.register_jo().await?;

    let res = app.request(Method::POST, "/api/courses", JO, Some(json!({}))).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json()?,
        json!({ "errors": ["A title is required", "A description is required", "An owner is required"] })
    );
    Ok(())
}

#[tokio::test]
async fn update_returns_204_and_is_visible() -> Result<()> {
    let app = TestApp::new();
    let owner = app.register_jo().await?;
    let id = app.create_course("Build a Basic Bookcase", owner).await?;

    let res = app
        .request(
            Method::PUT,
            &format!("/api/courses/{id}"),
            JO,
            Some(json!({ "title": "Build a Better Bookcase", "description": "Updated.", "userId": owner })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(res.body.is_empty());

    let course = app.get(&format!("/api/courses/{id}"), None).await?.json()?;
    assert_eq!(course["title"], "Build a Better Bookcase");
    assert_eq!(course["description"], "Updated.");
    Ok(())
}

#[tokio::test]
async fn partial_update_keeps_other_fields() -> Result<()> {
    let app = TestApp::new();
    let owner = app.register_jo().await?;
    let id = app.create_course("Build a Basic Bookcase", owner).await?;

    let res = app
        .request(Method::PUT, &format!("/api/courses/{id}"), JO, Some(json!({ "title": "Renamed" })))
        .await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let course = app.get(&format!("/api/courses/{id}"), None).await?.json()?;
    assert_eq!(course["title"], "Renamed");
    assert_eq!(course["description"], "A course.");
    assert_eq!(course["userId"], owner);
    Ok(())
}

#[tokio::test]
async fn update_with_blank_title_is_400() -> Result<()> {
    let app = TestApp::new();
    let owner = app.register_jo().await?;
    let id = app.create_course("Build a Basic Bookcase", owner).await?;

    let res = app
        .request(Method::PUT, &format!("/api/courses/{id}"), JO, Some(json!({ "title": "" })))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()?, json!({ "errors": ["A title is required"] }));
    Ok(())
}

#[tokio::test]
async fn delete_returns_204_and_removes() -> Result<()> {
    let app = TestApp::new();
    let owner = app.register_jo().await?;
    let id = app.create_course("Build a Basic Bookcase", owner).await?;

    let res = app.request(Method::DELETE, &format!("/api/courses/{id}"), JO, None).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app.get(&format!("/api/courses/{id}"), None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/courses", None).await?.json()?, json!([]));
    Ok(())
}

#[tokio::test]
async fn unresolved_ids_are_404() -> Result<()> {
    let app = TestApp::new();
    let owner = app.register_jo().await?;
    let not_found = json!({ "message": "Course not found" });

    let res = app.get("/api/courses/42", None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()?, not_found);

    let res = app.get("/api/courses/not-a-number", None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .request(
            Method::PUT,
            "/api/courses/42",
            JO,
            Some(json!({ "title": "t", "description": "d", "userId": owner })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()?, not_found);

    let res = app.request(Method::DELETE, "/api/courses/42", JO, None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn any_principal_may_modify_any_course() -> Result<()> {
    let app = TestApp::new();
    let owner = app.register_jo().await?;
    let id = app.create_course("Build a Basic Bookcase", owner).await?;
    app.register("Sam", "Smith", "sam@example.com", "hunter22").await?;

    let res = app
        .request(Method::DELETE, &format!("/api/courses/{id}"), Some(("sam@example.com", "hunter22")), None)
        .await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    Ok(())
}

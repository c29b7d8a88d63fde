#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use course_api::auth::Credentials;
use course_api::config::AppConfig;
use course_api::database::Store;

pub const JO_EMAIL: &str = "jo@example.com";
pub const JO_PASSWORD: &str = "secret1";

/// Router over a fresh in-memory store
pub struct TestApp {
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body)
            .with_context(|| format!("body is not JSON: {:?}", String::from_utf8_lossy(&self.body)))
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(Store::memory())
    }

    pub fn with_store(store: Store) -> Self {
        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        Self {
            router: course_api::app_with_config(store, &config),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        auth: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((name, pass)) = auth {
            let credentials = Credentials {
                name: name.to_string(),
                pass: pass.to_string(),
            };
            builder = builder.header(header::AUTHORIZATION, credentials.to_header_value());
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?.to_vec();

        Ok(TestResponse { status, headers, body })
    }

    pub async fn get(&self, uri: &str, auth: Option<(&str, &str)>) -> Result<TestResponse> {
        self.request(Method::GET, uri, auth, None).await
    }

    pub async fn register(&self, first: &str, last: &str, email: &str, password: &str) -> Result<TestResponse> {
        self.request(
            Method::POST,
            "/api/users",
            None,
            Some(json!({
                "firstName": first,
                "lastName": last,
                "emailAddress": email,
                "password": password,
            })),
        )
        .await
    }

    /// Register Jo and return the new account id
    pub async fn register_jo(&self) -> Result<i64> {
        let res = self.register("Jo", "Lee", JO_EMAIL, JO_PASSWORD).await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "registration failed: {}", res.status);
        let me = self.get("/api/users", Some((JO_EMAIL, JO_PASSWORD))).await?.json()?;
        me["id"].as_i64().context("account id missing")
    }

    /// Create a course as Jo and return its id, parsed from the Location header
    pub async fn create_course(&self, title: &str, owner: i64) -> Result<i64> {
        self.create_course_as((JO_EMAIL, JO_PASSWORD), title, owner).await
    }

    pub async fn create_course_as(&self, auth: (&str, &str), title: &str, owner: i64) -> Result<i64> {
        let res = self
            .request(
                Method::POST,
                "/api/courses",
                Some(auth),
                Some(json!({ "title": title, "description": "A course.", "userId": owner })),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "course creation failed: {}", res.status);
        let location = res.location().context("missing Location header")?;
        location
            .strip_prefix("courses/")
            .context("unexpected Location")?
            .parse()
            .context("non-numeric course id")
    }
}

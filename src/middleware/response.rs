use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// Successful API response: a JSON body, or an empty body with an
/// optional `Location` header.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub status_code: StatusCode,
    pub location: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with a JSON body
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            status_code: StatusCode::OK,
            location: None,
        }
    }
}

impl ApiResponse<()> {
    /// 201 Created, empty body, `Location` pointing at the new resource
    pub fn created(location: impl Into<String>) -> Self {
        Self {
            data: None,
            status_code: StatusCode::CREATED,
            location: Some(location.into()),
        }
    }

    /// 204 No Content
    pub fn no_content() -> Self {
        Self {
            data: None,
            status_code: StatusCode::NO_CONTENT,
            location: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let mut response = match self.data {
            Some(data) => (self.status_code, Json(data)).into_response(),
            None => self.status_code.into_response(),
        };

        if let Some(location) = self.location {
            match location.parse() {
                Ok(value) => {
                    response.headers_mut().insert(LOCATION, value);
                }
                Err(e) => tracing::error!("Invalid Location header '{}': {}", location, e),
            }
        }

        response
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

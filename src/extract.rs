//! Request extractors whose rejections use the application error body
//! instead of axum's plain-text responses.

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Query,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_valid::{Valid, ValidRejection};

use crate::error::ApiError;
use crate::handlers::pages;

/// JSON body; malformed or incomplete bodies are a 400 `ErrorResponse`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; unparsable segments are a 400 `ErrorResponse`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string deserialized and checked against its `validator` rules.
pub struct ValidQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    Valid<Query<T>>: FromRequestParts<S, Rejection = ValidRejection<QueryRejection>>,
    T: Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Valid(Query(value)) = Valid::<Query<T>>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Rejection of the page extractors, rendered as an HTML error page.
pub struct PageRejection(ApiError);

impl From<FormRejection> for PageRejection {
    fn from(rejection: FormRejection) -> Self {
        Self(ApiError::from(rejection))
    }
}

impl From<PathRejection> for PageRejection {
    fn from(rejection: PathRejection) -> Self {
        Self(ApiError::from(rejection))
    }
}

impl IntoResponse for PageRejection {
    fn into_response(self) -> Response {
        pages::error_page(self.0)
    }
}

#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(PageRejection))]
pub struct PageForm<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PageRejection))]
pub struct PagePath<T>(pub T);

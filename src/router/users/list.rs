//! Paged listing of users with pagination metadata in a header.

use axum::extract::{Query, State};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::negotiate::{Encoding, Negotiated};
use crate::user::UserDto;
use crate::{AppState, ServerError};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 20;
pub const X_PAGINATION: &str = "x-pagination";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageQuery {
    page_number: Option<i64>,
    page_size: Option<i64>,
}

/// Always serialized as JSON, whatever the body encoding.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationHeader {
    previous_page_link: Option<String>,
    next_page_link: String,
    total_count: i64,
    page_size: i64,
    current_page: i64,
    total_pages: i64,
}

pub async fn handler(
    State(state): State<AppState>,
    encoding: Encoding,
    Query(query): Query<PageQuery>,
) -> Result<Response, ServerError> {
    let page_number = query.page_number.filter(|number| *number >= 1).unwrap_or(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let page = state.store.get_page(page_number, page_size).await?;

    // Both links carry the current page parameters.
    let previous_page = page_link(&state.config.url, page_number, page_size);
    let next_page = page_link(&state.config.url, page_number, page_size);

    let pagination = PaginationHeader {
        previous_page_link: (page_number > 1).then_some(previous_page),
        next_page_link: next_page,
        total_count: page.total_count,
        page_size,
        current_page: page_number,
        total_pages: page.total_pages,
    };
    let pagination =
        serde_json::to_string(&pagination).map_err(|err| ServerError::Internal {
            details: err.to_string(),
        })?;

    let users: Vec<UserDto> = page.items.iter().map(UserDto::from).collect();

    let mut response = Negotiated::new(encoding, users).into_response();
    response.headers_mut().insert(
        X_PAGINATION,
        HeaderValue::from_str(&pagination).map_err(|err| ServerError::Internal {
            details: err.to_string(),
        })?,
    );

    Ok(response)
}

fn page_link(base_url: &str, page_number: i64, page_size: i64) -> String {
    format!("{base_url}/users?pageNumber={page_number}&pageSize={page_size}")
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;

    use super::{PaginationHeader, X_PAGINATION};
    use crate::user::{NewUser, UserDto};
    use crate::*;

    async fn seed(state: &AppState, count: usize) {
        for index in 0..count {
            state
                .store
                .insert(NewUser {
                    login: format!("user{index:02}"),
                    first_name: Some("A".into()),
                    last_name: Some("B".into()),
                })
                .await
                .unwrap();
        }
    }

    async fn list(
        app: axum::Router,
        path: &str,
    ) -> (PaginationHeader, Vec<UserDto>) {
        let response = make_request(app, Method::GET, path, String::default()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let pagination = response.headers()[X_PAGINATION].to_str().unwrap();
        let pagination: PaginationHeader = serde_json::from_str(pagination).unwrap();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let users: Vec<UserDto> = serde_json::from_slice(&body).unwrap();

        (pagination, users)
    }

    #[tokio::test]
    async fn test_list_defaults() {
        let state = router::state();
        let app = app(state.clone());
        seed(&state, 25).await;

        let (pagination, users) = list(app, "/users").await;
        assert_eq!(users.len(), 10);
        assert_eq!(users[0].login, "user00");
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.page_size, 10);
        assert_eq!(pagination.total_count, 25);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.previous_page_link, None);
    }

    #[tokio::test]
    async fn test_page_size_is_clamped() {
        let state = router::state();
        let app = app(state.clone());
        seed(&state, 25).await;

        let (pagination, users) = list(app.clone(), "/users?pageSize=999").await;
        assert_eq!(users.len(), 20);
        assert_eq!(pagination.page_size, 20);

        let (pagination, users) = list(app.clone(), "/users?pageSize=0").await;
        assert_eq!(users.len(), 1);
        assert_eq!(pagination.page_size, 1);

        let (pagination, users) = list(app, "/users?pageSize=-5").await;
        assert_eq!(users.len(), 1);
        assert_eq!(pagination.page_size, 1);
    }

    #[tokio::test]
    async fn test_page_number_is_normalized() {
        let state = router::state();
        let app = app(state.clone());
        seed(&state, 5).await;

        let (pagination, users) = list(app.clone(), "/users?pageNumber=0").await;
        assert_eq!(pagination.current_page, 1);
        assert_eq!(users[0].login, "user00");

        let (pagination, _) = list(app, "/users?pageNumber=-3").await;
        assert_eq!(pagination.current_page, 1);
    }

    #[tokio::test]
    async fn test_next_link_uses_current_page_parameters() {
        let state = router::state();
        let app = app(state.clone());
        seed(&state, 25).await;

        let (pagination, _) = list(app, "/users?pageNumber=2&pageSize=10").await;
        assert_eq!(
            pagination.next_page_link,
            "http://localhost:1111/users?pageNumber=2&pageSize=10"
        );
        assert_eq!(
            pagination.previous_page_link.as_deref(),
            Some(pagination.next_page_link.as_str())
        );
    }

    #[tokio::test]
    async fn test_huge_page_number_returns_empty_page() {
        let state = router::state();
        let app = app(state.clone());
        seed(&state, 3).await;

        let (pagination, users) =
            list(app, &format!("/users?pageNumber={}", i64::MAX)).await;
        assert!(users.is_empty());
        assert_eq!(pagination.current_page, i64::MAX);
        assert_eq!(pagination.total_count, 3);
    }

    #[tokio::test]
    async fn test_list_past_the_last_page() {
        let state = router::state();
        let app = app(state.clone());
        seed(&state, 3).await;

        let (pagination, users) = list(app, "/users?pageNumber=9").await;
        assert!(users.is_empty());
        assert_eq!(pagination.total_count, 3);
        assert!(pagination.next_page_link.ends_with("pageNumber=9&pageSize=10"));
    }
}

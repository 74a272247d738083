//! The page to display when a route or resource does not exist.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// Renders the 404 page.
pub struct NotFoundError;

impl IntoResponse for NotFoundError {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            error_view(
                "Not Found",
                "404",
                "Something's missing.",
                "Sorry, we can't find that page. You'll find lots to explore on the home page.",
            ),
        )
            .into_response()
    }
}

/// Fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    NotFoundError.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_utils::{assert_valid_html, parse_html_document};

    use super::get_404_not_found;

    #[tokio::test]
    async fn renders_not_found_page() {
        let response = get_404_not_found().await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let h1 = scraper::Selector::parse("h1").unwrap();
        let header = document.select(&h1).next().expect("want a h1 heading");
        assert_eq!(header.text().collect::<String>().trim(), "404");
    }
}

use axum::{body::Body, http::StatusCode, response::Response};

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK, "want 200 OK");
}

/// The value of the header `header_name`, panicking if it is missing.
#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let Some(value) = response.headers().get(header_name) else {
        panic!("want a {header_name} header, found none");
    };

    value
        .to_str()
        .unwrap_or_else(|error| panic!("{header_name} is not valid text: {error}"))
        .to_owned()
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    assert_eq!(get_header(response, "content-type"), content_type);
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}

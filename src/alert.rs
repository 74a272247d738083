//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as HTML fragments that HTMX swaps into the
//! `#alert-container` element defined in the base page template.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A message to show the user after an action completes or fails.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action succeeded, with a message and more details.
    Success { message: String, details: String },
    /// The action failed, with a message and an explanation of how to fix it.
    Error { message: String, details: String },
    /// The action succeeded and a short message is enough.
    SuccessSimple { message: String },
}

const SUCCESS_STYLE: &str = "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
    dark:bg-gray-800 dark:text-green-400 border border-green-300 dark:border-green-800";

const ERROR_STYLE: &str = "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
    dark:bg-gray-800 dark:text-red-400 border border-red-300 dark:border-red-800";

impl Alert {
    /// Render the alert as an HTML fragment.
    ///
    /// Success alerts are swapped out-of-band into the alert container so that
    /// they still show when the triggering element is removed, e.g. a deleted table row.
    pub fn into_html(self) -> Markup {
        let (style, message, details, is_success) = match self {
            Alert::Success { message, details } => (SUCCESS_STYLE, message, details, true),
            Alert::Error { message, details } => (ERROR_STYLE, message, details, false),
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message, String::new(), true),
        };

        html! {
            div
                hx-swap-oob=[is_success.then_some("innerHTML:#alert-container")]
            {
                div
                    role="alert"
                    class=(style)
                    onclick="this.remove()"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p { (details) }
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

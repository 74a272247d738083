//! The page explaining how an administrator resets a forgotten password.

use axum::{response::IntoResponse, response::Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{base, link, log_in_register},
};

fn forgot_password_view() -> Markup {
    let content = html! {
        div class="space-y-4 text-gray-900 dark:text-white"
        {
            p class="text-justify"
            {
                "Passwords are reset by whoever runs this server. Ask them to
                run the 'reset_password' program from the directory the server
                runs in, pointing it at the database file and your username:"
            }

            pre class="p-2 overflow-x-auto text-sm rounded bg-gray-100 dark:bg-gray-700"
            {
                code { "reset_password --db-path <DB_PATH> --username <USERNAME>" }
            }

            p
            {
                "Remembered it? " (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    };

    base(
        "Forgot Password",
        &[],
        &log_in_register("Forgot your password?", &content),
    )
}

/// Renders a page describing how the user's password can be reset.
pub async fn get_forgot_password_page() -> Response {
    forgot_password_view().into_response()
}

//! User accounts, passwords and cookie sessions.

mod forgot_password;
mod guard;
mod log_in;
mod log_out;
mod password;
mod register_user;
mod session;
mod user;

pub use forgot_password::get_forgot_password_page;
pub use guard::{auth_guard, auth_guard_hx, safe_redirect_target};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use password::{PasswordHash, ValidatedPassword};
pub use register_user::{get_register_page, register_user};
pub use session::{DEFAULT_SESSION_DURATION, REMEMBER_ME_DURATION, end_session, start_session};
pub use user::{
    User, UserID, Username, count_users, create_user, create_user_table, get_user_by_username,
    update_password,
};

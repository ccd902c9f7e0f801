pub mod auth_state;
pub mod session_id;
pub mod session_values;
pub mod user_id;
pub mod user_name;
pub mod user_password;

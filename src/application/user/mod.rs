mod user_service;

pub use user_service::{delete_user, get_user, list_users, register_user, update_user};

mod booking_service;
mod state_query;

pub use booking_service::{create_booking, get_booking, set_approval};
pub use state_query::{list_by_booker, list_by_owner};

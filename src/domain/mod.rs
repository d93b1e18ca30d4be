pub mod booking;
pub mod booking_state;
pub mod comment;
pub mod commands;
pub mod errors;
pub mod item;
pub mod item_request;
pub mod user;
pub mod value_objects;

pub use booking::{BookedItem, Booking, BookingStatus};
pub use booking_state::{BookingFilter, BookingState};
pub use comment::Comment;
pub use errors::*;
pub use item::{Item, ItemPatch};
pub use item_request::ItemRequest;
pub use user::{User, UserPatch};
pub use value_objects::*;

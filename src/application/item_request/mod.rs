mod item_request_service;

pub use item_request_service::{
    ItemRequestDetails, create_item_request, get_item_request, list_other_requests,
    list_own_requests,
};

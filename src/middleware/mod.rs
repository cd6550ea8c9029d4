pub mod request_id;

pub use request_id::{
    current_request_id, request_id_layer, scope_request_id, RequestIdExt, X_REQUEST_ID,
};

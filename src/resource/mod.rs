pub mod listing;

pub use listing::{AppState, EndpointSettings};

//! API layer - HTTP endpoints

pub mod health;
pub mod router;
pub mod state;
pub mod types;
pub mod v1;

pub use router::{create_router_with_extras, create_router_with_state, RouterExtras};
pub use state::{AppState, QueryServiceTrait};

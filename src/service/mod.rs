pub mod state;

pub use state::{ServiceState, SharedState};

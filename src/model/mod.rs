//! Model repository access and the loaded model state.

mod repo;
mod state;

pub use repo::ModelRepo;
pub use state::{ModelInfo, ModelState};

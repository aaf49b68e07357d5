/// UI layer: stateless render functions over [`crate::state::AppState`].
pub mod panels;
pub mod results;

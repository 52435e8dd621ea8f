pub mod pixel;
pub mod classifier;
pub mod dominant;
pub mod mapping;
pub mod recolor;
pub mod utils;

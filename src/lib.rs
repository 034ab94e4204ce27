pub mod components;
pub mod plugins;
pub mod resources;
pub mod utils;

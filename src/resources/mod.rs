pub mod cli;
pub mod region_data;
pub mod rng;
pub mod settings;

pub use cli::*;
pub use region_data::*;
pub use rng::*;
pub use settings::*;

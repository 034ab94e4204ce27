pub mod oscilloscope;
pub mod particle_field;
pub mod pointer_fx;
pub mod typewriter;

pub use oscilloscope::*;
pub use particle_field::*;
pub use pointer_fx::*;
pub use typewriter::*;

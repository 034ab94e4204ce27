pub mod cancel;
pub mod geometry;

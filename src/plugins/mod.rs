pub mod core;
pub mod input;
pub mod debug_ui;
pub mod decor;
pub mod particle_field;
pub mod showcase;
pub mod text_reveal;

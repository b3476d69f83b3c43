pub mod bounce;
pub mod interact;
pub mod player;

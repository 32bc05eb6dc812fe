pub mod gate;
pub mod identity;
pub mod repository;
pub mod sessions;

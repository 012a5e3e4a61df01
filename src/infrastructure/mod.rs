pub mod database;
pub mod media;

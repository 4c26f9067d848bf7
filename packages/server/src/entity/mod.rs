pub mod emoji;
pub mod profile;

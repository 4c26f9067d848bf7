pub mod emoji;
pub mod generate;

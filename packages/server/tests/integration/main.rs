mod common;
mod emoji;

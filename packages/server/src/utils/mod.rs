pub mod jwt;
pub mod object_key;

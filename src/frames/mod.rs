pub mod generator;
pub mod layout;

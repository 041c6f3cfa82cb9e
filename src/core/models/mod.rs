pub mod cost;
pub mod message;

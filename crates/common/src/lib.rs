pub mod codec;
pub mod condition;
pub mod rule;

pub mod core;
pub mod mexc;
pub mod observability;
pub mod persistence;
pub mod yahoo;

pub mod connector;
pub mod keys;

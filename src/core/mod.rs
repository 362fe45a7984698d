pub mod context;
pub mod engine;
pub mod rate_limit;
pub mod scope;
pub mod seed;

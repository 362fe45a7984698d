pub mod catalog;
pub mod encoder;
pub mod injector;
pub mod loader;

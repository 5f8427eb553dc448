pub mod counter;
pub mod error;
pub mod index;
pub mod models;
pub mod normalize;
pub mod service;
pub mod store;

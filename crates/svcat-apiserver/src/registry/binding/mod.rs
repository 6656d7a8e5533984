mod strategy;

pub mod storage;

pub use strategy::BindingStrategy;

pub mod configuration;
pub mod console;
pub mod controller;
pub mod error_handling;
pub mod gateway;
pub mod notification;
pub mod refresh;
pub mod scheduler;
pub mod view;

#[cfg(test)]
mod test_support;

pub mod calendar;
pub mod clock;
pub mod overlay;
pub mod resolver;
pub mod service;

#[cfg(test)]
pub mod fixtures;

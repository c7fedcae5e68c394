pub mod aggregator;
pub mod handlers;
mod services;
pub mod streak;
pub mod trend;

pub use handlers::router;

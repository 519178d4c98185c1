pub mod time_greeting;
pub mod service;

pub use time_greeting::{LocalClock, TimeGreetingService};
pub use service::GreetingService;

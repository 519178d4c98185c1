use std::sync::Arc;
use tokio::sync::Mutex;

use crate::greeting::GreetingService;

#[derive(Clone)]
pub struct AppState {
    pub greeting_service: Arc<GreetingService>,
    /// Greet commands run one at a time
    pub greet_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(greeting_service: Arc<GreetingService>) -> Self {
        Self {
            greeting_service,
            greet_lock: Arc::new(Mutex::new(())),
        }
    }
}

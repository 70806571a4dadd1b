use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use lekha_config::Config;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    batch_active: AtomicBool,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            batch_active: AtomicBool::new(false),
        }
    }

    /// Claim the single run slot. Exactly one run may be active at a time;
    /// returns false when another run holds the slot.
    pub fn try_begin_run(&self) -> bool {
        self.batch_active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn end_run(&self) {
        self.batch_active.store(false, Ordering::SeqCst);
    }

    pub fn run_active(&self) -> bool {
        self.batch_active.load(Ordering::SeqCst)
    }
}

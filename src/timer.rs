//! Monotonic time source used for slot-expiry bookkeeping.

/// Provides monotonic millisecond ticks, relative to an unknown epoch.
pub trait Timer {
    /// Number of millisecond ticks since some unknown epoch
    fn ticks_ms(&self) -> u64;
}

#[cfg(any(test, feature = "mocks"))]
pub mod mock {
    use std::sync::{Arc, Mutex};

    /// Shared-handle mock timer; clones observe the same clock so a test can
    /// advance time while the coordinator holds its own copy.
    #[derive(Clone, Debug)]
    pub struct MockTimer(Arc<Mutex<u64>>);

    impl MockTimer {
        pub fn new() -> Self {
            Self(Arc::new(Mutex::new(0)))
        }

        pub fn set_ms(&mut self, ms: u64) {
            *self.0.lock().unwrap() = ms;
        }

        pub fn advance_ms(&mut self, ms: u64) {
            *self.0.lock().unwrap() += ms;
        }
    }

    impl super::Timer for MockTimer {
        fn ticks_ms(&self) -> u64 {
            *self.0.lock().unwrap()
        }
    }
}

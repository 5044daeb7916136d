//! Time-based reference minting.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use donations_types::{Clock, PaymentMethod, SystemClock};

/// Mints `<method>_<epoch millis>` references.
///
/// Values are strictly increasing within a process: when the clock has not
/// moved past the last issued millisecond, the next one is `last + 1`.
pub struct ReferenceGenerator {
    clock: Arc<dyn Clock>,
    last: AtomicI64,
}

impl ReferenceGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicI64::new(0),
        }
    }

    /// Generator backed by the system clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Returns the next unique millisecond stamp.
    pub fn next_millis(&self) -> i64 {
        let now = self.clock.now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    /// Returns a fresh reference for `method`, e.g. `manual_1718000000000`.
    pub fn next(&self, method: PaymentMethod) -> String {
        format!("{}_{}", method.as_str(), self.next_millis())
    }
}

impl Default for ReferenceGenerator {
    fn default() -> Self {
        Self::system()
    }
}

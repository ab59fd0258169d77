//! Build configuration visible to the `dunc` module
//!
//! Python callers cannot pass the configuration explicitly, so a routine
//! invocation installs it here for the duration of the call.

use dunc_config::BuildConfig;
use std::sync::{Arc, Mutex};

static ACTIVE: Mutex<Option<Arc<BuildConfig>>> = Mutex::new(None);

/// Restores the previously active configuration when dropped
pub struct ContextGuard {
    previous: Option<Arc<BuildConfig>>,
}

pub fn enter(config: Arc<BuildConfig>) -> ContextGuard {
    let previous = match ACTIVE.lock() {
        Ok(mut active) => active.replace(config),
        Err(poisoned) => poisoned.into_inner().replace(config),
    };
    ContextGuard { previous }
}

pub fn current() -> Option<Arc<BuildConfig>> {
    match ACTIVE.lock() {
        Ok(active) => active.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        match ACTIVE.lock() {
            Ok(mut active) => *active = previous,
            Err(poisoned) => *poisoned.into_inner() = previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_restores_previous_config() {
        let outer = Arc::new(BuildConfig::default());
        let inner = Arc::new(BuildConfig::default());

        let outer_guard = enter(Arc::clone(&outer));
        {
            let _inner_guard = enter(Arc::clone(&inner));
            assert!(current().is_some_and(|c| Arc::ptr_eq(&c, &inner)));
        }
        assert!(current().is_some_and(|c| Arc::ptr_eq(&c, &outer)));
        drop(outer_guard);
    }
}

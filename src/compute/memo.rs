use crate::error::FunctionError;
use std::fmt;
use std::sync::OnceLock;

/// Compute-once slot holding the outcome of a single evaluation.
///
/// Failures are recorded like successes: a function that failed once keeps
/// returning the same error.
pub struct Memo<T> {
    slot: OnceLock<Result<T, FunctionError>>,
}

impl<T: Clone> Memo<T> {
    pub fn new() -> Self {
        Self { slot: OnceLock::new() }
    }

    pub fn get_or_compute<F>(&self, evaluate: F) -> Result<T, FunctionError>
    where
        F: FnOnce() -> Result<T, FunctionError>,
    {
        self.slot.get_or_init(evaluate).clone()
    }

    pub fn get(&self) -> Option<&Result<T, FunctionError>> {
        self.slot.get()
    }

    pub fn is_set(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<T: Clone> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.get() {
            Some(result) => f.debug_tuple("Memo").field(result).finish(),
            None => f.write_str("Memo(<unevaluated>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_evaluates_once() {
        let memo = Memo::new();
        let calls = AtomicUsize::new(0);
        let eval = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        };
        assert_eq!(memo.get_or_compute(eval), Ok(7));
        assert_eq!(memo.get_or_compute(|| Ok(8)), Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_is_memoized() {
        let memo: Memo<i32> = Memo::new();
        let err = FunctionError::MathError("boom".into());
        assert_eq!(memo.get_or_compute(|| Err(err.clone())), Err(err.clone()));
        assert_eq!(memo.get_or_compute(|| Ok(1)), Err(err));
    }

    #[test]
    fn test_concurrent_callers_see_one_value() {
        let memo = Arc::new(Memo::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let memo = Arc::clone(&memo);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    memo.get_or_compute(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(42_u64)
                    })
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), Ok(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

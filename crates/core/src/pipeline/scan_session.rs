use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::shared::error::ScanError;

/// Admits at most one active scan per gate.
///
/// [`try_start`](Self::try_start) hands out a [`ScanToken`]; a second call
/// fails with [`ScanError::Busy`] until that token is dropped. Requests
/// are rejected, never queued.
#[derive(Clone, Debug, Default)]
pub struct ScanGate {
    active: Arc<AtomicBool>,
}

impl ScanGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_start(&self) -> Result<ScanToken, ScanError> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ScanError::Busy)?;
        Ok(ScanToken {
            active: self.active.clone(),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Proof of an active scan. Releases its gate on drop.
#[derive(Debug)]
pub struct ScanToken {
    active: Arc<AtomicBool>,
}

impl Drop for ScanToken {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::ErrorKind;

    #[test]
    fn test_second_start_is_rejected() {
        let gate = ScanGate::new();
        let _token = gate.try_start().unwrap();
        let err = gate.try_start().unwrap_err();
        assert!(matches!(err, ScanError::Busy));
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn test_drop_releases_gate() {
        let gate = ScanGate::new();
        let token = gate.try_start().unwrap();
        assert!(gate.is_busy());
        drop(token);
        assert!(!gate.is_busy());
        assert!(gate.try_start().is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let gate = ScanGate::new();
        let other = gate.clone();
        let _token = gate.try_start().unwrap();
        assert!(other.try_start().is_err());
    }

    #[test]
    fn test_independent_gates() {
        let a = ScanGate::new();
        let b = ScanGate::new();
        let _token = a.try_start().unwrap();
        assert!(b.try_start().is_ok());
    }

    #[test]
    fn test_only_one_thread_wins() {
        let gate = ScanGate::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = gate.clone();
                std::thread::spawn(move || gate.try_start().ok())
            })
            .collect();
        // Tokens are returned (and kept alive) so no winner releases early.
        let tokens: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(tokens.iter().filter(|t| t.is_some()).count(), 1);
    }
}

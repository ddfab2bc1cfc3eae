use std::sync::atomic::{AtomicU8, Ordering};

const UNKNOWN: u8 = 0;
const UNSUPPORTED: u8 = 1;
const SUPPORTED: u8 = 2;

/// Write-once memo of whether the OS implements directory case sensitivity.
///
/// Concurrent first callers may each run the probe; whichever write lands
/// first is kept, and the probe gives the same answer for all of them.
#[derive(Debug)]
pub struct SupportState(AtomicU8);

impl SupportState {
    pub const fn new() -> Self {
        Self(AtomicU8::new(UNKNOWN))
    }

    /// `None` until the first successful probe.
    pub fn get(&self) -> Option<bool> {
        match self.0.load(Ordering::Acquire) {
            SUPPORTED => Some(true),
            UNSUPPORTED => Some(false),
            _ => None,
        }
    }

    /// Record the probe result and return the value now stored.
    pub fn set(&self, supported: bool) -> bool {
        let value = if supported { SUPPORTED } else { UNSUPPORTED };
        match self
            .0
            .compare_exchange(UNKNOWN, value, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => supported,
            Err(existing) => existing == SUPPORTED,
        }
    }
}

impl Default for SupportState {
    fn default() -> Self {
        Self::new()
    }
}

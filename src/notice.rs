//! Rate-limited advisory about the quality-control level of this data source.

use log::warn;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How long a single emission suppresses further notices.
pub(crate) const DEFAULT_NOTICE_COOLDOWN: Duration = Duration::from_secs(8 * 60 * 60);

const NOTICE: &str = "Locally managed network data is associated with reduced levels of \
quality control and data completeness compared with the national networks; treat it as provisional.";

/// Emission gate for the recurring data-quality advisory.
///
/// The advisory is informational and must not repeat on every call, so the
/// gate records when it last fired and stays quiet for the cooldown window.
/// Safe to share between concurrent callers; at most one of them emits per
/// window.
pub struct QcNotice {
    cooldown: Duration,
    last_emitted_at: Mutex<Option<Instant>>,
}

impl QcNotice {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_emitted_at: Mutex::new(None),
        }
    }

    /// Emits the advisory unless one already fired within the cooldown
    /// window. Returns whether this call emitted.
    pub fn emit(&self) -> bool {
        let Ok(mut last) = self.last_emitted_at.lock() else {
            // A poisoned gate only ever costs us a notice.
            return false;
        };
        let now = Instant::now();
        match *last {
            Some(at) if now.duration_since(at) < self.cooldown => false,
            _ => {
                *last = Some(now);
                warn!("{}", NOTICE);
                true
            }
        }
    }
}

impl Default for QcNotice {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_COOLDOWN)
    }
}

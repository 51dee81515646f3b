//! # Serial Numbers
//!
//! Every build gets a serial of the form `pass-<unix-millis>-<seq>`. The
//! timestamp keeps serials readable and sortable; `seq` is a process-wide
//! monotonic counter, so two builds inside the same millisecond still differ.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed prefix of every serial number.
pub const SERIAL_PREFIX: &str = "pass";

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// The serial number of one built pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerialNumber(String);

impl SerialNumber {
    /// Generate the next serial for a build issued at `at`.
    pub fn generate(at: DateTime<Utc>) -> Self {
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{SERIAL_PREFIX}-{}-{seq}", at.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_serial_has_prefix_and_timestamp() {
        let at = Utc::now();
        let serial = SerialNumber::generate(at);
        let expected = format!("pass-{}-", at.timestamp_millis());
        assert!(serial.as_str().starts_with(&expected), "{serial}");
    }

    #[test]
    fn test_same_millisecond_serials_differ() {
        let at = Utc::now();
        let serials: HashSet<_> = (0..1000).map(|_| SerialNumber::generate(at)).collect();
        assert_eq!(serials.len(), 1000);
    }

    #[test]
    fn test_serials_unique_across_threads() {
        let at = Utc::now();
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(move || (0..250).map(|_| SerialNumber::generate(at)).collect::<Vec<_>>()))
            .collect();
        let mut all = HashSet::new();
        for handle in handles {
            for serial in handle.join().unwrap() {
                assert!(all.insert(serial));
            }
        }
        assert_eq!(all.len(), 1000);
    }
}

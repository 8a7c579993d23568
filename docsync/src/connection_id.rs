use std::sync::atomic::{AtomicU64, Ordering};

static LAST_CONNECTION_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies one live session within this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionId {
    pub fn new() -> Self {
        let id = LAST_CONNECTION_ID.fetch_add(1, Ordering::SeqCst);
        ConnectionId(id)
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn:{}", self.0)
    }
}

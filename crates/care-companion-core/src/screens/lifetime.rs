//! Screen lifetime tracking.

use tokio_util::sync::CancellationToken;

/// Cancellation scope of one mounted screen.
///
/// Work started from a screen holds a child token; once the screen is unmounted (or dropped)
/// that work observes the cancellation and discards its result.
#[derive(Debug, Default)]
pub struct ScreenLifetime {
    token: CancellationToken,
}

impl ScreenLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for a task that must not outlive the screen.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn unmount(&self) {
        self.token.cancel();
    }
}

impl Drop for ScreenLifetime {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

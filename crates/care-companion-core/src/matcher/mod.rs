//! Scripted symptom chat.
//!
//! Pipeline: user text → [`SymptomMatcher`] → canned reply, delivered after a simulated delay.

mod symptoms;

pub use symptoms::*;

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::CoreConfig;

/// Produces bot replies after a fixed latency, as if a remote service answered.
#[derive(Debug, Clone)]
pub struct ChatResponder {
    matcher: SymptomMatcher,
    delay: Duration,
}

impl ChatResponder {
    pub fn new(matcher: SymptomMatcher, delay: Duration) -> Self {
        Self { matcher, delay }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(SymptomMatcher::new(), config.chat_reply_delay())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn matcher(&self) -> &SymptomMatcher {
        &self.matcher
    }

    /// Wait out the reply delay and answer `input`.
    ///
    /// Returns `None` if `token` is cancelled first.
    pub async fn reply(&self, input: &str, token: &CancellationToken) -> Option<String> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("chat reply cancelled before delivery");
                None
            }
            _ = tokio::time::sleep(self.delay) => Some(self.matcher.respond(input)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_reply_after_delay() {
        let responder = ChatResponder::new(SymptomMatcher::new(), Duration::from_millis(1000));
        let token = CancellationToken::new();

        let started = tokio::time::Instant::now();
        let reply = responder.reply("bad headache", &token).await;

        assert_eq!(
            reply.as_deref(),
            Some("Bot: Based on your symptoms, you have headache")
        );
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_reply() {
        let responder = ChatResponder::from_config(&CoreConfig::default());
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(responder.reply("fever", &token).await, None);
    }
}

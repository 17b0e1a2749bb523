use std::sync::Arc;
use std::time::Duration;

use pm_core::{ChatMessage, ChatService, NewChatMessage, Result};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use crate::session::SessionStore;

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// Blank draft or no session; nothing was sent and the draft is untouched.
    Skipped,
}

/// The shared chat: latest message list plus the means to post to it.
///
/// Messages are published through a watch channel in exactly the order the
/// service returned them.
#[derive(Clone)]
pub struct ChatRoom {
    service: Arc<dyn ChatService>,
    session: Arc<SessionStore>,
    messages: Arc<watch::Sender<Vec<ChatMessage>>>,
}

impl ChatRoom {
    pub fn new(service: Arc<dyn ChatService>, session: Arc<SessionStore>) -> Self {
        let (messages, _) = watch::channel(Vec::new());
        Self {
            service,
            session,
            messages: Arc::new(messages),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.messages.subscribe()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.borrow().clone()
    }

    /// Fetches the full list and publishes it.
    pub async fn refresh(&self) -> Result<usize> {
        let messages = self.service.list().await?;
        let count = messages.len();
        self.messages.send_replace(messages);
        Ok(count)
    }

    /// Fetches once right away, then every `interval` until the returned
    /// poller is stopped or dropped.
    ///
    /// Each tick runs its fetch as a separate task, so a slow or failing
    /// request never delays the next tick.
    pub fn start(&self, interval: Duration) -> ChatPoller {
        let room = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut inflight = JoinSet::new();
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let room = room.clone();
                        inflight.spawn(async move {
                            if let Err(e) = room.refresh().await {
                                tracing::warn!("Chat refresh failed: {}", e);
                            }
                        });
                    }
                    Some(_) = inflight.join_next() => {}
                }
            }
        });
        tracing::debug!("Chat polling every {:?}", interval);
        ChatPoller { handle }
    }

    /// Posts the trimmed draft as the current user.
    ///
    /// On success the draft is cleared and the list is re-fetched at once
    /// instead of waiting for the next tick.
    pub async fn send(&self, draft: &mut String) -> Result<SendOutcome> {
        let text = draft.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Skipped);
        }
        let Some(session) = self.session.current_session().await? else {
            return Ok(SendOutcome::Skipped);
        };

        let message = NewChatMessage {
            user_id: session.user.id,
            username: session.user.username,
            message: text.to_string(),
        };
        self.service.post(&message).await?;
        draft.clear();

        if let Err(e) = self.refresh().await {
            tracing::warn!("Chat refresh after send failed: {}", e);
        }
        Ok(SendOutcome::Sent)
    }
}

/// Handle of the polling task; the timer dies with it.
#[derive(Debug)]
pub struct ChatPoller {
    handle: JoinHandle<()>,
}

impl ChatPoller {
    pub fn stop(self) {
        // Drop does the work.
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for ChatPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fakes::{logged_in, logged_out, FakeChat};

    #[tokio::test(start_paused = true)]
    async fn test_polls_immediately_then_on_interval() {
        let service = Arc::new(FakeChat::new());
        service.push("officer2", "на месте");
        let room = ChatRoom::new(service.clone(), logged_out());
        let mut updates = room.subscribe();

        let poller = room.start(POLL_INTERVAL);
        updates.changed().await.unwrap();
        assert_eq!(updates.borrow().len(), 1);

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(service.list_calls(), 3);

        poller.stop();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(service.list_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_keeps_polling() {
        let service = Arc::new(FakeChat::new());
        service.fail_list(true);
        let room = ChatRoom::new(service.clone(), logged_out());
        let poller = room.start(POLL_INTERVAL);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(service.list_calls(), 2);
        assert!(room.messages().is_empty());

        service.fail_list(false);
        service.push("officer2", "снова в сети");
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(room.messages().len(), 1);
        assert!(poller.is_running());
    }

    #[tokio::test]
    async fn test_send_posts_clears_and_refreshes() {
        let service = Arc::new(FakeChat::new());
        let room = ChatRoom::new(service.clone(), logged_in(false).await);

        let mut draft = "  hello  ".to_string();
        assert_eq!(room.send(&mut draft).await.unwrap(), SendOutcome::Sent);
        assert!(draft.is_empty());

        let posted = service.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].message, "hello");
        assert_eq!(posted[0].username, "officer1");
        assert_eq!(service.list_calls(), 1);
        assert_eq!(room.messages()[0].message, "hello");
    }

    #[tokio::test]
    async fn test_send_unauthenticated_or_blank_is_skipped() {
        let service = Arc::new(FakeChat::new());
        let room = ChatRoom::new(service.clone(), logged_out());
        let mut draft = "hello".to_string();
        assert_eq!(room.send(&mut draft).await.unwrap(), SendOutcome::Skipped);
        assert_eq!(draft, "hello");

        let room = ChatRoom::new(service.clone(), logged_in(false).await);
        let mut blank = "   ".to_string();
        assert_eq!(room.send(&mut blank).await.unwrap(), SendOutcome::Skipped);
        assert_eq!(blank, "   ");
        assert!(service.posted().is_empty());
        assert_eq!(service.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_post_keeps_draft() {
        let service = Arc::new(FakeChat::new());
        service.fail_post(true);
        let room = ChatRoom::new(service.clone(), logged_in(false).await);
        let mut draft = "hello".to_string();
        assert!(room.send(&mut draft).await.is_err());
        assert_eq!(draft, "hello");
    }
}

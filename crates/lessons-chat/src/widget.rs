use crate::error::ChatError;
use crate::message::{ChatMessage, Conversation, Role};
use crate::page::PageContext;
use crate::transport::{ChatConfig, ChatTransport};
use crate::wire::{ApiMessage, ChatRequest};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was blank; nothing happened.
    Ignored,
    /// Another request is still in flight; nothing happened.
    Busy,
    /// An assistant reply was appended.
    Replied,
    /// An error bubble was appended.
    Failed,
}

/// Controller behind the chat panel.
///
/// Holds the visible conversation and allows one request in flight at a time.
/// A submission made while a request is pending is turned away, the same as
/// a disabled send button.
pub struct ChatWidget<T> {
    transport: T,
    config: ChatConfig,
    conversation: Mutex<Conversation>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when dropped, whatever path the request took.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<T: ChatTransport> ChatWidget<T> {
    pub fn new(transport: T, config: ChatConfig) -> Self {
        Self {
            transport,
            config,
            conversation: Mutex::new(Conversation::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Snapshot of the visible bubbles.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.conversation().messages().to_vec()
    }

    fn conversation(&self) -> MutexGuard<'_, Conversation> {
        self.conversation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Send `input` with the current page as context and append the outcome.
    ///
    /// Never fails: transport errors become an error bubble.
    pub async fn submit(&self, input: &str, page: &PageContext) -> SubmitOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let Some(endpoint) = self.config.endpoint() else {
            tracing::warn!("no chat endpoint configured");
            self.conversation()
                .push(ChatMessage::error(&ChatError::NoEndpoint.to_string()));
            return SubmitOutcome::Failed;
        };

        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("chat request already in flight");
            return SubmitOutcome::Busy;
        };

        let request = {
            let mut conversation = self.conversation();
            conversation.push(ChatMessage::user(text));
            let mut messages = vec![ApiMessage::new(Role::System, page.system_prompt())];
            messages.extend(conversation.context());
            messages.push(ApiMessage::new(Role::User, text));
            ChatRequest {
                model: self.config.model.clone(),
                messages,
                max_tokens: self.config.max_tokens,
            }
        };

        tracing::debug!(
            url = %endpoint.url,
            messages = request.messages.len(),
            page = %page.page,
            "sending chat request"
        );

        match self.transport.complete(&endpoint, &request).await {
            Ok(completion) => {
                self.conversation()
                    .push(ChatMessage::assistant(completion.reply_text()));
                SubmitOutcome::Replied
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                self.conversation()
                    .push(ChatMessage::error(&err.to_string()));
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageId;
    use crate::transport::Endpoint;
    use crate::wire::ChatCompletion;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    /// Replies with canned results and records every request it sees.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<Vec<Result<String, ChatError>>>,
        seen: Mutex<Vec<(Endpoint, ChatRequest)>>,
        delay: Option<Duration>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<String, ChatError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ChatTransport for Arc<ScriptedTransport> {
        async fn complete(
            &self,
            endpoint: &Endpoint,
            request: &ChatRequest,
        ) -> Result<ChatCompletion, ChatError> {
            self.seen
                .lock()
                .unwrap()
                .push((endpoint.clone(), request.clone()));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Ok(String::new()))?;
            Ok(serde_json::from_value(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": reply}}]
            }))
            .unwrap())
        }
    }

    fn proxied() -> ChatConfig {
        ChatConfig {
            proxy_url: Some("http://localhost:4000".into()),
            ..Default::default()
        }
    }

    fn page() -> PageContext {
        PageContext::new(PageId::Lesson(2), vec![], "Files and directories.")
    }

    #[tokio::test]
    async fn reply_is_rendered_and_history_is_sent() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok("**hello**".into()),
            Ok("see [ls](#listing-files)".into()),
        ]));
        let widget = ChatWidget::new(transport.clone(), proxied());

        assert_eq!(widget.submit("hi", &page()).await, SubmitOutcome::Replied);
        assert_eq!(widget.submit("  and ls?  ", &page()).await, SubmitOutcome::Replied);

        let messages = widget.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].text, "and ls?");
        assert_eq!(
            messages[3].html.as_deref(),
            Some("<p>see <a href=\"#listing-files\">ls</a></p>")
        );

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].0.url, "http://localhost:4000/api/chat");
        let second = &seen[1].1;
        assert_eq!(second.model, crate::transport::DEFAULT_MODEL);
        assert_eq!(second.max_tokens, 1024);
        let roles: Vec<_> = second.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert!(second.messages[0].content.contains("Current page: lesson-02."));
        assert_eq!(second.messages[2].content, "**hello**");
        assert_eq!(second.messages[3].content, "and ls?");
    }

    #[tokio::test]
    async fn failed_exchange_is_left_out_of_context() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok("hello".into()),
            Err(ChatError::Http {
                status: 500,
                detail: "boom".into(),
            }),
            Ok("fine".into()),
        ]));
        let widget = ChatWidget::new(transport.clone(), proxied());

        widget.submit("hi", &page()).await;
        assert_eq!(widget.submit("bad", &page()).await, SubmitOutcome::Failed);
        assert!(!widget.is_busy());
        widget.submit("again", &page()).await;

        let messages = widget.messages();
        assert!(messages[3].is_error);
        assert_eq!(
            messages[3].html.as_deref(),
            Some("<p><strong>Error:</strong> 500 boom</p>")
        );

        let seen = transport.seen.lock().unwrap();
        let contents: Vec<_> = seen[2].1.messages[1..]
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, ["hi", "hello", "again"]);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let transport = Arc::new(ScriptedTransport::default());
        let widget = ChatWidget::new(transport.clone(), proxied());
        assert_eq!(widget.submit(" \n ", &page()).await, SubmitOutcome::Ignored);
        assert!(widget.messages().is_empty());
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_endpoint_shows_error_without_sending() {
        let transport = Arc::new(ScriptedTransport::default());
        let widget = ChatWidget::new(transport.clone(), ChatConfig::default());
        assert_eq!(widget.submit("hi", &page()).await, SubmitOutcome::Failed);

        let messages = widget.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_error);
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_submission_while_pending_is_busy() {
        let transport = Arc::new(ScriptedTransport {
            delay: Some(Duration::from_millis(50)),
            ..ScriptedTransport::new(vec![Ok("slow".into())])
        });
        let widget = ChatWidget::new(transport.clone(), proxied());
        let page = page();

        let (first, second) = tokio::join!(widget.submit("one", &page), async {
            tokio::task::yield_now().await;
            widget.submit("two", &page).await
        });
        assert_eq!(first, SubmitOutcome::Replied);
        assert_eq!(second, SubmitOutcome::Busy);
        assert!(!widget.is_busy());
        assert_eq!(widget.messages().len(), 2);
        assert_eq!(transport.seen.lock().unwrap().len(), 1);
    }
}

//! Remote participant exposed as a service handle.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::hooks::definitions::Hook;
use crate::hooks::error::ServiceError;
use crate::hooks::service::HookService;

use super::channel::RemoteChannel;

/// A browser-hosted session that takes part in hook fan-out.
///
/// Every hook it answers becomes a `hookTriggerMessage` on the channel; the
/// correlated `hookResultMessage` decides the outcome.
#[derive(Debug, Clone)]
pub struct RemoteService {
    /// Display name.
    name: String,
    /// Shared channel.
    channel: Arc<RemoteChannel>,
    /// Session id on the channel.
    cid: String,
    /// Hooks the remote side implements; `None` means all.
    hooks: Option<HashSet<String>>,
}

impl RemoteService {
    /// Creates a handle for session `cid` on `channel`.
    pub fn new(channel: Arc<RemoteChannel>, cid: impl Into<String>) -> Self {
        let cid = cid.into();
        Self {
            name: format!("remote {cid}"),
            channel,
            cid,
            hooks: None,
        }
    }

    /// Restricts the hooks this handle answers to `names`.
    pub fn with_hooks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hooks = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the session id.
    pub fn cid(&self) -> &str {
        &self.cid
    }

    /// Executes a command in this session.
    pub async fn execute_command(
        &self,
        command_name: &str,
        args: Vec<Value>,
    ) -> Result<Value, ServiceError> {
        self.channel
            .execute_command(&self.cid, command_name, args)
            .await
    }
}

impl HookService for RemoteService {
    fn name(&self) -> &str {
        &self.name
    }

    fn hook(&self, name: &str) -> Option<Hook> {
        if let Some(allowed) = &self.hooks {
            if !allowed.contains(name) {
                return None;
            }
        }

        let channel = self.channel.clone();
        let cid = self.cid.clone();
        let hook_name = name.to_string();

        Some(Hook::new(name, move |args| {
            let channel = channel.clone();
            let cid = cid.clone();
            let hook_name = hook_name.clone();
            async move { channel.trigger_hook(&cid, &hook_name, args).await }
        }))
    }
}

#[cfg(test)]
mod tests {
    use hookrelay_core::config::RelayConfig;
    use hookrelay_protocol::message::types::SocketMessage;

    use super::*;

    #[test]
    fn test_allow_list_hides_other_hooks() {
        let (channel, _outbound) = RemoteChannel::with_queue(RelayConfig::default());
        let service = RemoteService::new(Arc::new(channel), "0-0").with_hooks(["beforeTest"]);

        assert!(service.hook("beforeTest").is_some());
        assert!(service.hook("afterTest").is_none());
        assert_eq!(service.name(), "remote 0-0");
    }

    #[tokio::test]
    async fn test_hook_sends_trigger_for_its_session() {
        let (channel, mut outbound) = RemoteChannel::with_queue(RelayConfig::default());
        let channel = Arc::new(channel);
        let service = RemoteService::new(channel.clone(), "0-3");

        let hook = service.hook("afterSuite").unwrap();
        let call = tokio::spawn(hook.call(vec![serde_json::json!({"title": "suite"})]));

        match outbound.recv().await.unwrap() {
            SocketMessage::HookTriggerMessage(trigger) => {
                assert_eq!(trigger.cid, "0-3");
                assert_eq!(trigger.name, "afterSuite");
                channel.handle_inbound(SocketMessage::hook_result(&trigger.id, None));
            }
            other => panic!("unexpected message {other}"),
        }

        assert!(call.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_execute_command_targets_its_session() {
        let (channel, mut outbound) = RemoteChannel::with_queue(RelayConfig::default());
        let channel = Arc::new(channel);
        let service = RemoteService::new(channel.clone(), "0-4");
        assert_eq!(service.cid(), "0-4");

        let call = {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .execute_command("getTitle", vec![serde_json::json!("#app")])
                    .await
            })
        };

        match outbound.recv().await.unwrap() {
            SocketMessage::CommandRequestMessage(request) => {
                assert_eq!(request.cid, "0-4");
                assert_eq!(request.command_name, "getTitle");
                channel.handle_inbound(SocketMessage::command_response_ok(
                    &request.id,
                    Some(serde_json::json!("Dashboard")),
                ));
            }
            other => panic!("unexpected message {other}"),
        }

        assert_eq!(call.await.unwrap().unwrap(), serde_json::json!("Dashboard"));
    }
}

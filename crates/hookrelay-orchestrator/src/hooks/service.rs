//! Service handles and a closure-backed in-process implementation.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use serde_json::Value;

use super::definitions::Hook;
use super::error::ServiceError;

/// A pluggable unit that may implement any number of named hooks.
///
/// The orchestrator never assumes a particular hook exists: `None` from
/// [`hook`](Self::hook) means "not implemented" and is treated as success.
pub trait HookService: Send + Sync + fmt::Debug {
    /// Returns a display name for logs.
    fn name(&self) -> &str;

    /// Looks up a hook by name.
    fn hook(&self, name: &str) -> Option<Hook>;
}

/// In-process service whose hooks are closures.
#[derive(Debug, Clone)]
pub struct LocalService {
    /// Service name.
    name: String,
    /// Hook name → hook.
    hooks: HashMap<String, Hook>,
}

impl LocalService {
    /// Starts building a service.
    pub fn builder(name: impl Into<String>) -> ServiceBuilder {
        ServiceBuilder {
            name: name.into(),
            hooks: HashMap::new(),
        }
    }

    /// Returns the names of the hooks this service implements.
    pub fn hook_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl HookService for LocalService {
    fn name(&self) -> &str {
        &self.name
    }

    fn hook(&self, name: &str) -> Option<Hook> {
        self.hooks.get(name).cloned()
    }
}

/// Builder for [`LocalService`].
#[derive(Debug)]
pub struct ServiceBuilder {
    name: String,
    hooks: HashMap<String, Hook>,
}

impl ServiceBuilder {
    /// Adds a hook. A later hook with the same name replaces the earlier one.
    pub fn hook<F, Fut>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
    {
        self.hooks
            .insert(name.to_string(), Hook::new(name, handler));
        self
    }

    /// Adds a hook that returns a value, such as a command.
    pub fn command<F, Fut>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ServiceError>> + Send + 'static,
    {
        self.hooks
            .insert(name.to_string(), Hook::returning(name, handler));
        self
    }

    /// Finishes the service.
    pub fn build(self) -> LocalService {
        LocalService {
            name: self.name,
            hooks: self.hooks,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_lookup_by_name() {
        let service = LocalService::builder("reporter")
            .hook("onPrepare", |_| async { Ok(()) })
            .command("count", |args| async move { Ok(json!(args.len())) })
            .build();

        assert_eq!(service.name(), "reporter");
        assert_eq!(service.hook_names(), vec!["count", "onPrepare"]);
        assert!(service.hook("onComplete").is_none());

        let count = service.hook("count").unwrap();
        assert_eq!(count.call(vec![json!(1), json!(2)]).await.unwrap(), json!(2));
    }
}

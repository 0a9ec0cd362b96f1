//! Hook handles and the fixed argument shapes of lifecycle points.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::error::ServiceError;

/// Future returned by a hook invocation.
pub type HookFuture = BoxFuture<'static, Result<Value, ServiceError>>;

type HookFn = dyn Fn(Vec<Value>) -> HookFuture + Send + Sync;

/// A named, cloneable async callable.
///
/// Arguments are passed positionally; their count and order reach the
/// implementation unchanged. Hooks resolve to `Value::Null`; commands may
/// return any value.
#[derive(Clone)]
pub struct Hook {
    /// Hook name, used as its identity in logs and failure attribution.
    name: String,
    /// Handler function.
    handler: Arc<HookFn>,
}

impl Hook {
    /// Creates a hook from an async closure without a return value.
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
    {
        Self::returning(name, move |args| {
            let fut = handler(args);
            async move { fut.await.map(|()| Value::Null) }
        })
    }

    /// Creates a hook from an async closure that produces a value.
    pub fn returning<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ServiceError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            handler: Arc::new(move |args| -> HookFuture { Box::pin(handler(args)) }),
        }
    }

    /// Returns the hook name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the hook.
    pub fn call(&self, args: Vec<Value>) -> HookFuture {
        (self.handler)(args)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("handler", &"<closure>")
            .finish()
    }
}

/// One hook or a list of hooks, as accepted by the launcher and
/// on-complete lifecycle points.
#[derive(Debug, Clone)]
pub enum Hooks {
    /// A single hook.
    One(Hook),
    /// A list of hooks.
    Many(Vec<Hook>),
}

impl Hooks {
    /// Normalizes into a list.
    pub fn into_vec(self) -> Vec<Hook> {
        match self {
            Self::One(hook) => vec![hook],
            Self::Many(hooks) => hooks,
        }
    }
}

impl From<Hook> for Hooks {
    fn from(hook: Hook) -> Self {
        Self::One(hook)
    }
}

impl From<Vec<Hook>> for Hooks {
    fn from(hooks: Vec<Hook>) -> Self {
        Self::Many(hooks)
    }
}

/// Test counts handed to on-complete hooks as their fourth argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnCompleteResult {
    /// Workers that finished.
    pub finished: u32,
    /// Workers that passed.
    pub passed: u32,
    /// Retries performed.
    pub retries: u32,
    /// Workers that failed.
    pub failed: u32,
}

impl OnCompleteResult {
    /// Returns the JSON argument form.
    pub fn to_value(&self) -> Value {
        json!({
            "finished": self.finished,
            "passed": self.passed,
            "retries": self.retries,
            "failed": self.failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hook_receives_args_in_order() {
        let hook = Hook::returning("echo", |args| async move { Ok(Value::Array(args)) });
        let out = hook.call(vec![json!(1), json!(null), json!("x")]).await.unwrap();
        assert_eq!(out, json!([1, null, "x"]));
    }

    #[tokio::test]
    async fn test_unit_hook_resolves_to_null() {
        let hook = Hook::new("noop", |_| async { Ok(()) });
        assert_eq!(hook.call(vec![]).await.unwrap(), Value::Null);
        assert_eq!(hook.name(), "noop");
    }

    #[test]
    fn test_single_hook_normalizes_to_list() {
        let hook = Hook::new("only", |_| async { Ok(()) });
        let hooks: Hooks = hook.into();
        let list = hooks.into_vec();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name(), "only");
    }

    #[test]
    fn test_on_complete_result_value() {
        let result = OnCompleteResult {
            finished: 3,
            passed: 2,
            retries: 1,
            failed: 1,
        };
        assert_eq!(
            result.to_value(),
            json!({"finished": 3, "passed": 2, "retries": 1, "failed": 1})
        );
    }
}

//! Hook orchestrator: fans a hook out to every handle and aggregates the outcomes.
//!
//! All three modes follow the same rules:
//! - Every invocation is started before any is awaited, and every one is
//!   awaited to completion. A failure never cancels a sibling.
//! - Only errors carrying the severe marker change the result. Everything
//!   else is logged at error level and tolerated.
//!
//! The modes differ in input shape and in what they return:
//! - [`run_service_hook`]: a named hook across service handles; fails with
//!   every severe message joined, attributed to the hook name.
//! - [`run_launcher_hook`]: one or more launcher hooks; fails with the first
//!   severe message, attributed to the first hook in the list.
//! - [`run_on_complete_hook`]: one or more on-complete hooks; returns a
//!   `0`/`1` code per hook, or fails attributed to `onComplete`.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde_json::{Value, json};
use tracing::{debug, error};

use super::definitions::{Hooks, OnCompleteResult};
use super::error::{HookFailure, ServiceError};
use super::outcome::{HookOutcome, ServiceHookReport, Verdict};
use super::service::HookService;

/// Origin label of on-complete hook failures.
pub const ON_COMPLETE_ORIGIN: &str = "onComplete";

/// Runs `hook_name` on every service and reports each outcome.
pub async fn run_service_hook_report(
    services: &[Arc<dyn HookService>],
    hook_name: &str,
    args: Vec<Value>,
) -> ServiceHookReport {
    let start = Instant::now();

    let invocations = services.iter().enumerate().map(|(index, service)| {
        let origin = format!("#{index} {}", service.name());
        let hook = service.hook(hook_name);
        let args = args.clone();

        async move {
            let Some(hook) = hook else {
                return HookOutcome::Success;
            };

            match hook.call(args).await {
                Ok(_) => HookOutcome::Success,
                Err(err) => classify(hook_name, origin, &err),
            }
        }
    });

    let outcomes = join_all(invocations).await;
    let elapsed = start.elapsed();

    if !services.is_empty() {
        debug!(
            hook = %hook_name,
            services = services.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Finished to run hook"
        );
    }

    let verdict = Verdict::from_outcomes(&outcomes);

    ServiceHookReport {
        hook: hook_name.to_string(),
        outcomes,
        verdict,
        elapsed,
    }
}

/// Runs `hook_name` on every service.
///
/// Fails when at least one service raised a severe error; the failure
/// message contains every severe message and none of the tolerated ones.
pub async fn run_service_hook(
    services: &[Arc<dyn HookService>],
    hook_name: &str,
    args: Vec<Value>,
) -> Result<(), HookFailure> {
    run_service_hook_report(services, hook_name, args)
        .await
        .into_result()
}

/// Runs launcher hooks with shared arguments.
///
/// A severe error fails the call with that error's message. The failure is
/// always attributed to the first hook in the list, whichever hook raised it.
pub async fn run_launcher_hook(
    hooks: impl Into<Hooks>,
    args: Vec<Value>,
) -> Result<(), HookFailure> {
    let hooks = hooks.into().into_vec();
    let Some(first) = hooks.first() else {
        return Ok(());
    };
    let origin = first.name().to_string();

    let results = join_all(hooks.iter().map(|hook| hook.call(args.clone()))).await;

    let mut severe: Option<ServiceError> = None;
    for (hook, result) in hooks.iter().zip(results) {
        if let Err(err) = result {
            error!(hook = %hook.name(), "Error in hook: {}", err.detail());
            if err.is_severe() && severe.is_none() {
                severe = Some(err);
            }
        }
    }

    match severe {
        Some(err) => Err(HookFailure::new(err.message, origin)),
        None => Ok(()),
    }
}

/// Runs on-complete hooks with `(exit_code, config, capabilities, results)`.
///
/// Returns one code per hook: `0` on success, `1` on a tolerated failure.
pub async fn run_on_complete_hook(
    hooks: impl Into<Hooks>,
    exit_code: i32,
    config: &Value,
    capabilities: &Value,
    results: &OnCompleteResult,
) -> Result<Vec<i32>, HookFailure> {
    let hooks = hooks.into().into_vec();
    let args = vec![
        json!(exit_code),
        config.clone(),
        capabilities.clone(),
        results.to_value(),
    ];

    let settled = join_all(hooks.iter().map(|hook| hook.call(args.clone()))).await;

    let mut codes = Vec::with_capacity(settled.len());
    let mut severe: Option<ServiceError> = None;
    for (hook, result) in hooks.iter().zip(settled) {
        match result {
            Ok(_) => codes.push(0),
            Err(err) => {
                error!(hook = %hook.name(), "Error in onCompleteHook: {}", err.detail());
                if err.is_severe() && severe.is_none() {
                    severe = Some(err);
                }
                codes.push(1);
            }
        }
    }

    match severe {
        Some(err) => Err(HookFailure::new(err.message, ON_COMPLETE_ORIGIN)),
        None => Ok(codes),
    }
}

fn classify(hook_name: &str, origin: String, err: &ServiceError) -> HookOutcome {
    let message = format!(
        "A service failed in the '{hook_name}' hook ({origin})\n{}\n\n",
        err.detail()
    );

    if err.is_severe() {
        return HookOutcome::FatalFailure { message, origin };
    }

    error!(hook = %hook_name, origin = %origin, "{message}Continue...");
    HookOutcome::RecoverableFailure { message, origin }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::hooks::definitions::Hook;
    use crate::hooks::service::LocalService;

    fn services(list: Vec<LocalService>) -> Vec<Arc<dyn HookService>> {
        list.into_iter()
            .map(|s| Arc::new(s) as Arc<dyn HookService>)
            .collect()
    }

    #[tokio::test]
    async fn test_no_services_is_ok() {
        let report = run_service_hook_report(&[], "onPrepare", vec![]).await;
        assert!(report.verdict.is_ok());
        assert!(report.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_missing_hook_is_success_without_invocation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let list = services(vec![
            LocalService::builder("a").build(),
            LocalService::builder("b")
                .hook("onPrepare", move |_| {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }
                })
                .build(),
        ]);

        let report = run_service_hook_report(&list, "onPrepare", vec![]).await;
        assert_eq!(report.outcomes, vec![HookOutcome::Success, HookOutcome::Success]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_fatal_messages_are_joined() {
        let list = services(vec![
            LocalService::builder("one")
                .hook("before", |_| async { Err(ServiceError::severe("first fatal")) })
                .build(),
            LocalService::builder("two")
                .hook("before", |_| async { Err(ServiceError::new("just noise")) })
                .build(),
            LocalService::builder("three")
                .hook("before", |_| async { Err(ServiceError::severe("second fatal")) })
                .build(),
        ]);

        let failure = run_service_hook(&list, "before", vec![]).await.unwrap_err();
        assert_eq!(failure.origin, "before");
        assert!(failure.message.contains("first fatal"));
        assert!(failure.message.contains("second fatal"));
        assert!(failure.message.contains("(#0 one)"));
        assert!(failure.message.contains("(#2 three)"));
        assert!(!failure.message.contains("just noise"));
    }

    #[tokio::test]
    async fn test_args_reach_every_service() {
        let list = services(vec![
            LocalService::builder("check")
                .hook("onWorkerStart", |args| async move {
                    if args == vec![json!("0-0"), json!({"browserName": "chrome"})] {
                        Ok(())
                    } else {
                        Err(ServiceError::severe("wrong args"))
                    }
                })
                .build(),
        ]);

        let args = vec![json!("0-0"), json!({"browserName": "chrome"})];
        assert!(run_service_hook(&list, "onWorkerStart", args).await.is_ok());
    }

    #[tokio::test]
    async fn test_launcher_failure_is_attributed_to_first_hook() {
        let hooks = vec![
            Hook::new("firstHook", |_| async { Ok(()) }),
            Hook::new("secondHook", |_| async { Err(ServiceError::severe("launcher broke")) }),
        ];

        let failure = run_launcher_hook(hooks, vec![]).await.unwrap_err();
        assert_eq!(failure.message, "launcher broke");
        // Attribution stays on the first hook even though the second one failed.
        assert_eq!(failure.origin, "firstHook");
    }

    #[tokio::test]
    async fn test_launcher_tolerates_ordinary_errors() {
        let hook = Hook::new("onPrepare", |_| async { Err(ServiceError::new("flaky")) });
        assert!(run_launcher_hook(hook, vec![json!({})]).await.is_ok());
    }

    #[tokio::test]
    async fn test_launcher_with_no_hooks() {
        assert!(run_launcher_hook(Vec::<Hook>::new(), vec![]).await.is_ok());
    }

    #[tokio::test]
    async fn test_launcher_runs_siblings_after_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let hooks = vec![
            Hook::new("broken", |_| async { Err(ServiceError::severe("stop")) }),
            Hook::new("counted", move |_| {
                let counter = counter.clone();
                async move {
                    tokio::task::yield_now().await;
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
        ];

        assert!(run_launcher_hook(hooks, vec![]).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_on_complete_codes() {
        let hooks = vec![
            Hook::new("a", |_| async { Err(ServiceError::new("report upload failed")) }),
            Hook::new("b", |_| async { Ok(()) }),
        ];

        let codes = run_on_complete_hook(
            hooks,
            0,
            &json!({}),
            &json!([]),
            &OnCompleteResult::default(),
        )
        .await
        .unwrap();
        assert_eq!(codes, vec![1, 0]);
    }

    #[tokio::test]
    async fn test_on_complete_receives_fixed_args() {
        let hook = Hook::new("inspect", |args| async move {
            let expected = vec![
                json!(1),
                json!({"specs": []}),
                json!({"browserName": "firefox"}),
                json!({"finished": 2, "passed": 1, "retries": 0, "failed": 1}),
            ];
            if args == expected {
                Ok(())
            } else {
                Err(ServiceError::new("unexpected args"))
            }
        });

        let results = OnCompleteResult {
            finished: 2,
            passed: 1,
            retries: 0,
            failed: 1,
        };
        let codes = run_on_complete_hook(
            hook,
            1,
            &json!({"specs": []}),
            &json!({"browserName": "firefox"}),
            &results,
        )
        .await
        .unwrap();
        assert_eq!(codes, vec![0]);
    }

    #[tokio::test]
    async fn test_on_complete_severe_fails_whole_call() {
        let hooks = vec![
            Hook::new("ok", |_| async { Ok(()) }),
            Hook::new("fatal", |_| async { Err(ServiceError::severe("cannot finish")) }),
        ];

        let failure = run_on_complete_hook(
            hooks,
            0,
            &json!({}),
            &json!({}),
            &OnCompleteResult::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(failure.origin, ON_COMPLETE_ORIGIN);
        assert_eq!(failure.message, "cannot finish");
    }
}

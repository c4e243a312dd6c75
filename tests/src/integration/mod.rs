//! Cross-crate integration tests.

pub mod flows;
pub mod query_bus;
pub mod resilience;

#[cfg(test)]
pub(crate) mod support {
    use social_runtime::{RuntimeConfig, SocialRuntime};
    use std::future::Future;
    use std::time::Duration;

    /// A started runtime with default configuration.
    pub fn started_runtime() -> SocialRuntime {
        started_with(RuntimeConfig::default())
    }

    pub fn started_with(config: RuntimeConfig) -> SocialRuntime {
        let runtime = SocialRuntime::new(config).unwrap();
        runtime.start().unwrap();
        runtime
    }

    /// Poll `check` until it yields a value, failing after one second.
    pub async fn eventually<T, F, Fut>(mut check: F) -> T
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                if let Some(value) = check().await {
                    return value;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not met within 1s")
    }
}

//! 启动阶段的退避重试
//!
//! 只用于进程启动时连接外部依赖；请求处理路径从不重试。

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// 指数退避策略，每次等待时间翻倍直到上限
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    /// 总尝试次数（含第一次），0 按 1 处理
    pub attempts: u32,
    pub first_delay: Duration,
    pub max_delay: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            attempts: 5,
            first_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl Backoff {
    /// 两次尝试之间的等待序列，长度为 `attempts - 1`
    fn delays(self) -> impl Iterator<Item = Duration> {
        (0..self.attempts.saturating_sub(1)).map(move |n| {
            self.first_delay
                .saturating_mul(2u32.saturating_pow(n))
                .min(self.max_delay)
        })
    }
}

/// 反复执行 `connect` 直到成功或次数用尽，返回最后一次的错误
pub async fn retry_startup<T, E, F, Fut>(what: &str, backoff: Backoff, mut connect: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut delays = backoff.delays();
    loop {
        let err = match connect().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let Some(delay) = delays.next() else {
            warn!(target: "startup", what, error = %err, "Giving up");
            return Err(err);
        };

        warn!(
            target: "startup",
            what,
            error = %err,
            retry_in_ms = delay.as_millis() as u64,
            "Not ready yet"
        );
        tokio::time::sleep(delay).await;
    }
}

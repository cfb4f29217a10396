use async_trait::async_trait;
use rand::Rng;
use std::{future::Future, time::Duration};

use crate::error::{Error, Result};

/// The [`reqwest::Client`] every Geekbench request goes through, identified by
/// our user agent and bounded by a per-request timeout. Search pages are public,
/// so no cookie jar is kept.
pub struct Client(pub reqwest::Client);

impl Client {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map(Self)
            .map_err(Error::Client)
    }
}

/// Anything that can hand out the HTML behind a URL.
#[async_trait]
pub trait PageSource {
    async fn fetch(&mut self, url: &str) -> Result<String>;
}

/// A randomized pause taken before every request, so that the benchmark site
/// sees a trickle instead of a burst.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Throttle {
    min: Duration,
    max: Duration,
}

impl Throttle {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draw a delay uniformly from `[min, max]`.
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    pub async fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Bounded retry with exponential backoff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Total number of tries, including the first one. Never less than 1.
    pub attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
        }
    }

    /// Delay before try number `attempt + 1`, given that try `attempt` (1-based) failed.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exp)
    }

    /// Run `op` until it succeeds, fails with a non-transient error, or runs
    /// out of attempts.
    pub async fn run<T, F, Fut>(&self, url: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.attempts => {
                    let delay = self.backoff(attempt);
                    log::warn!(
                        "{} (attempt {}/{}), retrying in {:.1}s",
                        err,
                        attempt,
                        self.attempts,
                        delay.as_secs_f64()
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(Error::Fetch { source, .. }) => {
                    return Err(Error::Fetch {
                        url: url.to_string(),
                        attempts: attempt,
                        source,
                    })
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Fetches pages over HTTP, pausing before every request and retrying
/// transient failures.
pub struct HttpSource {
    client: Client,
    throttle: Throttle,
    retry: RetryPolicy,
}

impl HttpSource {
    pub fn new(client: Client, throttle: Throttle, retry: RetryPolicy) -> Self {
        Self {
            client,
            throttle,
            retry,
        }
    }

    async fn get_once(&self, url: &str) -> Result<String> {
        let fetch_error = |source| Error::Fetch {
            url: url.to_string(),
            attempts: 1,
            source,
        };

        let res = self.client.0.get(url).send().await.map_err(fetch_error)?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status,
            });
        }
        res.text().await.map_err(fetch_error)
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch(&mut self, url: &str) -> Result<String> {
        let this = &*self;
        this.retry
            .run(url, || async move {
                this.throttle.pause().await;
                this.get_once(url).await
            })
            .await
    }
}

/// Convert a score like "1,700" to 1700.
///
/// ## Example
/// ```txt
/// "1700"    -> 1700
/// "12,345"  -> 12345
/// " 987 "   -> 987
/// "n/a"     -> None
/// ```
pub(crate) fn parse_score<T: AsRef<str>>(s: T) -> Option<u32> {
    s.as_ref()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect::<String>()
        .parse::<u32>()
        .ok()
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicU32, Ordering},
        time::Duration,
    };

    use reqwest::StatusCode;

    use super::{parse_score, Client, HttpSource, PageSource, RetryPolicy, Throttle};
    use crate::error::Error;

    fn unavailable() -> Error {
        Error::Status {
            url: "https://example.invalid/".to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("1700"), Some(1700));
        assert_eq!(parse_score("12,345"), Some(12345));
        assert_eq!(parse_score(" 987\n"), Some(987));
        assert_eq!(parse_score("n/a"), None);
        assert_eq!(parse_score(""), None);
    }

    #[test]
    fn test_throttle_bounds() {
        let throttle = Throttle::new(Duration::from_millis(2500), Duration::from_millis(1500));
        assert_eq!(throttle.max(), Duration::from_millis(2500));
        for _ in 0..100 {
            let d = throttle.sample();
            assert!(d >= Duration::from_millis(1500));
            assert!(d <= Duration::from_millis(2500));
        }
        assert_eq!(Throttle::none().sample(), Duration::ZERO);
    }

    #[test]
    fn test_backoff_doubles() {
        let retry = RetryPolicy::new(0, Duration::from_secs(2));
        assert_eq!(retry.attempts, 1);
        assert_eq!(retry.backoff(1), Duration::from_secs(2));
        assert_eq!(retry.backoff(2), Duration::from_secs(4));
        assert_eq!(retry.backoff(3), Duration::from_secs(8));
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let calls = &AtomicU32::new(0);
        let retry = RetryPolicy::new(3, Duration::ZERO);
        let result: crate::Result<()> = retry
            .run("https://example.invalid/", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(unavailable())
            })
            .await;
        assert!(matches!(result, Err(Error::Status { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_recovers() {
        let calls = &AtomicU32::new(0);
        let retry = RetryPolicy::new(3, Duration::ZERO);
        let result = retry
            .run("https://example.invalid/", || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(unavailable())
                } else {
                    Ok("<html></html>")
                }
            })
            .await;
        assert_eq!(result.unwrap(), "<html></html>");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_skips_permanent_errors() {
        let calls = &AtomicU32::new(0);
        let retry = RetryPolicy::new(5, Duration::ZERO);
        let result: crate::Result<()> = retry
            .run("https://example.invalid/", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::Status {
                    url: "https://example.invalid/".to_string(),
                    status: StatusCode::NOT_FOUND,
                })
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_http_source_reports_attempts() {
        let client = Client::new("benchscrape-test", Duration::from_secs(5)).unwrap();
        let mut source = HttpSource::new(
            client,
            Throttle::none(),
            RetryPolicy::new(2, Duration::ZERO),
        );
        // nothing listens on port 1
        let result = source.fetch("http://127.0.0.1:1/search?q=Apple").await;
        assert!(matches!(result, Err(Error::Fetch { attempts: 2, .. })));
    }
}

//! Shared HTTP agent, retry policy and bounded body reads for dataset downloads.

use std::io::{self, Read};
use std::sync::OnceLock;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounded exponential backoff settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first try.
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(4),
        }
    }
}

/// Process-wide agent with connect/read timeouts.
pub fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .build()
    })
}

/// Run `action` until it succeeds, `should_retry` refuses, or attempts run out.
///
/// `on_retry` sees the attempt number that just failed and its error.
pub fn with_retries<T, E, F, R>(
    policy: RetryPolicy,
    mut action: F,
    mut should_retry: R,
    mut on_retry: impl FnMut(usize, &E),
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    R: FnMut(&E) -> bool,
{
    let mut attempt = 0usize;
    loop {
        attempt += 1;
        match action() {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= policy.max_attempts.max(1) || !should_retry(&err) {
                    return Err(err);
                }
                on_retry(attempt, &err);
                std::thread::sleep(backoff_delay(policy, attempt));
            }
        }
    }
}

/// Read a response body into memory, failing once it exceeds `max_bytes`.
pub fn read_body_capped(response: ureq::Response, max_bytes: usize) -> Result<Vec<u8>, io::Error> {
    if let Some(length) = response
        .header("Content-Length")
        .and_then(|value| value.parse::<u64>().ok())
        && length > max_bytes as u64
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response too large: {length} bytes"),
        ));
    }
    let mut limited = response.into_reader().take(max_bytes as u64 + 1);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes)?;
    if bytes.len() > max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response exceeded {max_bytes} bytes"),
        ));
    }
    Ok(bytes)
}

fn backoff_delay(policy: RetryPolicy, attempt: usize) -> Duration {
    let exponent = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
    let factor = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
    policy
        .base_delay
        .checked_mul(factor)
        .unwrap_or(policy.max_delay)
        .min(policy.max_delay)
}


#[cfg(test)]
mod tests {
    use super::test_server::{ok_response, serve_sequence};
    use super::*;

    fn instant_policy(max_attempts: usize) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
        }
    }

    #[test]
    fn read_body_capped_rejects_declared_length_over_max() {
        let response = "HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nok".to_string();
        let url = serve_sequence(vec![response]);
        let response = agent().get(&url).call().unwrap();
        let err = read_body_capped(response, 10).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn read_body_capped_rejects_streamed_body_over_max() {
        let body = "a".repeat(32);
        let url = serve_sequence(vec![format!("HTTP/1.0 200 OK\r\n\r\n{body}")]);
        let response = agent().get(&url).call().unwrap();
        let err = read_body_capped(response, 16).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn read_body_capped_accepts_small_body() {
        let url = serve_sequence(vec![ok_response("hello")]);
        let response = agent().get(&url).call().unwrap();
        assert_eq!(read_body_capped(response, 16).unwrap(), b"hello");
    }

    #[test]
    fn with_retries_stops_after_success() {
        let mut attempts = 0usize;
        let mut retried = Vec::new();
        let result: Result<u32, &'static str> = with_retries(
            instant_policy(4),
            || {
                attempts += 1;
                if attempts < 3 { Err("fail") } else { Ok(7) }
            },
            |_| true,
            |attempt, _| retried.push(attempt),
        );
        assert_eq!(result, Ok(7));
        assert_eq!(attempts, 3);
        assert_eq!(retried, vec![1, 2]);
    }

    #[test]
    fn with_retries_gives_up_after_max_attempts() {
        let mut attempts = 0usize;
        let result: Result<u32, &'static str> = with_retries(
            instant_policy(3),
            || {
                attempts += 1;
                Err("fail")
            },
            |_| true,
            |_, _| {},
        );
        assert_eq!(result, Err("fail"));
        assert_eq!(attempts, 3);
    }

    #[test]
    fn with_retries_honors_should_retry() {
        let mut attempts = 0usize;
        let result: Result<u32, &'static str> = with_retries(
            instant_policy(3),
            || {
                attempts += 1;
                Err("fatal")
            },
            |_| false,
            |_, _| {},
        );
        assert_eq!(result, Err("fatal"));
        assert_eq!(attempts, 1);
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
        };
        assert_eq!(backoff_delay(policy, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(policy, 2), Duration::from_millis(200));
        assert_eq!(backoff_delay(policy, 3), Duration::from_millis(350));
        assert_eq!(backoff_delay(policy, 40), Duration::from_millis(350));
    }
}

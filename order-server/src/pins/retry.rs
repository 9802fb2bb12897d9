//! Bounded retry combinator

use std::future::Future;

/// Why [`retry_bounded`] gave up
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
    /// An attempt failed with an error that retrying cannot fix
    #[error("{0}")]
    Fatal(E),
}

/// Run `op` until it succeeds, fails fatally or `max_attempts` is reached.
///
/// `op` receives the 1-based attempt number. An error for which
/// `is_retryable` returns `false` stops immediately.
pub async fn retry_bounded<T, E, F, Fut, P>(
    max_attempts: u32,
    is_retryable: P,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !is_retryable(&e) => return Err(RetryError::Fatal(e)),
            Err(e) if attempt >= max_attempts => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: e,
                });
            }
            Err(_) => attempt += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Collision,
        Broken,
    }

    fn retryable(e: &TestError) -> bool {
        *e == TestError::Collision
    }

    #[tokio::test]
    async fn succeeds_after_collisions() {
        let result = retry_bounded(5, retryable, |attempt| async move {
            if attempt < 3 {
                Err(TestError::Collision)
            } else {
                Ok(attempt)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn stops_at_the_bound() {
        let mut calls = 0;
        let result: Result<(), _> = retry_bounded(4, retryable, |_| {
            calls += 1;
            async { Err(TestError::Collision) }
        })
        .await;
        assert!(matches!(
            result,
            Err(RetryError::Exhausted { attempts: 4, .. })
        ));
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn fatal_errors_are_not_retried() {
        let mut calls = 0;
        let result: Result<(), _> = retry_bounded(4, retryable, |_| {
            calls += 1;
            async { Err(TestError::Broken) }
        })
        .await;
        assert!(matches!(result, Err(RetryError::Fatal(TestError::Broken))));
        assert_eq!(calls, 1);
    }
}

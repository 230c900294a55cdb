use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Runs `f(item)` for every item in `items` with at most `concurrency`
/// tasks in flight at once; returns only once every task has finished.
///
/// Mirrors the `workers := make(chan int, concurrency); wg.Wait()` pattern
/// every ingest pipeline in `original_source/eth/methods.go` shares
/// (spec.md §4.2): a fixed worker pool pulls batches from a list and fans
/// out, the driver waits for all workers before returning, and batch
/// completion order is unconstrained.
pub async fn run_pooled<T, Fut, Out>(
    items: Vec<T>,
    concurrency: usize,
    f: impl Fn(T) -> Fut + Send + Sync + 'static,
) -> Vec<Out>
where
    T: Send + 'static,
    Fut: Future<Output = Out> + Send + 'static,
    Out: Send + 'static,
{
    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let f = Arc::new(f);
    let mut set = JoinSet::new();

    for item in items {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("worker pool semaphore never closes");
        let f = f.clone();
        set.spawn(async move {
            let _permit = permit;
            f(item).await
        });
    }

    let mut out = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(value) => out.push(value),
            Err(join_err) => {
                tracing::error!(error = %join_err, "ingest worker task panicked");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn runs_every_item_exactly_once() {
        let results = run_pooled(vec![1, 2, 3, 4, 5], 2, |n| async move { n * n }).await;
        let mut results = results;
        results.sort();
        assert_eq!(results, vec![1, 4, 9, 16, 25]);
    }

    #[tokio::test]
    async fn never_exceeds_configured_concurrency() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let items: Vec<usize> = (0..20).collect();
        let in_flight_c = in_flight.clone();
        let max_seen_c = max_seen.clone();
        run_pooled(items, 3, move |_| {
            let in_flight = in_flight_c.clone();
            let max_seen = max_seen_c.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .await;

        assert!(max_seen.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn zero_concurrency_is_clamped_to_one() {
        let results = run_pooled(vec![1, 2, 3], 0, |n| async move { n }).await;
        assert_eq!(results.len(), 3);
    }
}

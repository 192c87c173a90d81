//! Deadline-bounded execution under a caller cancellation token.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::Error;

/// Read budget applied to every article query.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(8);

/// Run `op` under a signal that fires at the earlier of `parent` being
/// cancelled or `budget` elapsing.
///
/// `op` receives the merged token and must honour it. When either source
/// fires the merged token is cancelled and the call fails with
/// [`Error::Cancelled`] or [`Error::Timeout`]; partial output is discarded.
pub async fn run_with_deadline<T, F, Fut>(
    parent: &CancellationToken,
    budget: Duration,
    op: F,
) -> Result<T, Error>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let signal = parent.child_token();
    let _guard = signal.clone().drop_guard();
    let work = op(signal.clone());

    tokio::select! {
        biased;
        _ = signal.cancelled() => Err(Error::Cancelled),
        _ = tokio::time::sleep(budget) => {
            signal.cancel();
            Err(Error::Timeout)
        }
        result = work => result,
    }
}

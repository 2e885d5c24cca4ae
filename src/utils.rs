use std::time::{Duration, Instant};

/// Logs how long `step` took since the previous trace point and returns the
/// new total elapsed time.
pub(crate) fn trace(l_type: &str, l_step: &str, started: Instant, last: Duration) -> Duration {
    let total = started.elapsed();
    log::trace!("{} | Total={:.2?} | {}={:.2?}", l_type, total, l_step, total.saturating_sub(last));
    total
}

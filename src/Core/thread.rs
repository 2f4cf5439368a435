use std::time::Duration;

/// Poll interval used by [`OverflowPolicy::Block`](crate::SPSC::OverflowPolicy::Block)
/// unless the builder overrides it.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Sleep the calling thread. A zero interval only yields.
pub fn sleep(interval: Duration) {
    if interval.is_zero() {
        std::thread::yield_now();
    } else {
        std::thread::sleep(interval);
    }
}

/// Sleep in steps of `interval` until `ready` returns true.
///
/// No timeout: this spins forever if the condition never holds.
/// Returns the number of sleeps taken.
pub fn poll_until(interval: Duration, mut ready: impl FnMut() -> bool) -> usize {
    let mut polls = 0;
    while !ready() {
        sleep(interval);
        polls += 1;
    }
    polls
}

//! Bounded polling of hardware status.
//!
//! Every busy-wait in this crate goes through [`poll_until`] so the wait
//! budget is a configuration choice rather than a hard-coded loop. The
//! default budget is [`PollBudget::Unbounded`]: a status bit that never
//! appears stalls the caller, exactly as a bare `while` loop would.

use embassy_time::{with_timeout, Duration, Timer};

use crate::error::{Error, WaitPoint};

/// How long a status poll may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollBudget {
    /// Poll until the condition holds, however long that takes.
    #[default]
    Unbounded,
    /// Evaluate the condition at most this many times (at least once).
    Iterations(u32),
}

impl PollBudget {
    fn exhausted(&self, evaluations: u32) -> bool {
        match *self {
            Self::Unbounded => false,
            Self::Iterations(max) => evaluations >= max.max(1),
        }
    }
}

/// Evaluate `cond` until it returns `true` or the budget runs out.
///
/// `cond` may perform side effects between observations (WFI, watchdog
/// refresh). Returns the number of evaluations on success.
pub fn poll_until<C>(budget: PollBudget, point: WaitPoint, mut cond: C) -> Result<u32, Error>
where
    C: FnMut() -> bool,
{
    let mut evaluations: u32 = 0;
    loop {
        evaluations = evaluations.saturating_add(1);
        if cond() {
            return Ok(evaluations);
        }
        if budget.exhausted(evaluations) {
            error!("wait {:?} expired after {} polls", point, evaluations);
            return Err(Error::Timeout(point));
        }
    }
}

/// Async poll of `cond` every `step`, giving up after `timeout`.
pub async fn poll_until_async<C>(
    timeout: Duration,
    step: Duration,
    point: WaitPoint,
    mut cond: C,
) -> Result<(), Error>
where
    C: FnMut() -> bool,
{
    let fut = async {
        loop {
            if cond() {
                return;
            }
            Timer::after(step).await;
        }
    };

    with_timeout(timeout, fut).await.map_err(|_| {
        error!("wait {:?} expired after {} us", point, timeout.as_micros());
        Error::Timeout(point)
    })
}

use rand::Rng;

/// Lower bound of the refresh margin, in seconds.
pub const MIN_REFRESH_MARGIN_SECS: i64 = 5 * 60;
/// Upper bound (exclusive) of the refresh margin, in seconds.
pub const MAX_REFRESH_MARGIN_SECS: i64 = 15 * 60;

/// How long before expiry a cached upstream token is already treated as stale.
///
/// Randomized per decision so clients sharing an expiry instant do not all
/// refresh at once.
pub trait JitterSource: Send + Sync {
    fn refresh_margin_secs(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn refresh_margin_secs(&self) -> i64 {
        rand::thread_rng().gen_range(MIN_REFRESH_MARGIN_SECS..MAX_REFRESH_MARGIN_SECS)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub i64);

impl JitterSource for FixedJitter {
    fn refresh_margin_secs(&self) -> i64 {
        self.0
    }
}

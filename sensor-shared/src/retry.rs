/// Bounded retry with a fixed backoff, for flaky bus operations.
///
/// The sleep is supplied by the caller so the policy itself stays
/// target-agnostic; it replaces ad-hoc busy-wait loops at the driver
/// boundary. Exhausting the attempt budget surfaces the last error; the
/// pipeline driver maps that to "no sample this tick".
#[derive(Debug, Clone, Copy)]
pub struct Retry {
    pub attempts: u32,
    pub backoff_ms: u32,
}

impl Default for Retry {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_ms: 10,
        }
    }
}

impl Retry {
    pub fn run<T, E>(
        &self,
        mut sleep_ms: impl FnMut(u32),
        mut op: impl FnMut() -> Result<T, E>,
    ) -> Result<T, E> {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(v) => return Ok(v),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.attempts {
                        return Err(e);
                    }
                    sleep_ms(self.backoff_ms);
                }
            }
        }
    }
}

//! Code generation input

use std::time::Duration;

use contracts::{Fragment, ResolvedModule};

/// Everything the generator needs, assembled by the caller.
///
/// Modules are already pruned; fragments are in plugin order.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeGenContext {
    pub modules: Vec<ResolvedModule>,
    pub fragments: Vec<Fragment>,
    pub status_interval: Duration,
    pub baud_rate: u32,
}

impl CodeGenContext {
    pub fn new(
        modules: Vec<ResolvedModule>,
        fragments: Vec<Fragment>,
        status_interval: Duration,
        baud_rate: u32,
    ) -> Self {
        Self {
            modules,
            fragments,
            status_interval,
            baud_rate,
        }
    }

    /// Status update interval in whole milliseconds, between 1 and
    /// `u32::MAX` so it fits the board's `unsigned long`
    pub fn status_interval_ms(&self) -> u32 {
        u32::try_from(self.status_interval.as_millis())
            .unwrap_or(u32::MAX)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_never_rounds_to_zero() {
        let ctx = CodeGenContext::new(vec![], vec![], Duration::from_micros(10), 9600);
        assert_eq!(ctx.status_interval_ms(), 1);

        let ctx = CodeGenContext::new(vec![], vec![], Duration::from_secs_f64(2.5), 9600);
        assert_eq!(ctx.status_interval_ms(), 2500);
    }

    #[test]
    fn test_interval_saturates_at_counter_width() {
        let ctx = CodeGenContext::new(vec![], vec![], Duration::from_secs(10_000_000), 9600);
        assert_eq!(ctx.status_interval_ms(), u32::MAX);
    }
}

//! Operation context configuration.

use std::time::Duration;

use tracing::warn;
use ward_validation::HookPolicy;

/// Environment variable holding the hook time budget in milliseconds.
pub const HOOK_BUDGET_ENV: &str = "WARD_HOOK_BUDGET_MS";
/// Environment variable toggling panic capture in hooks.
pub const CATCH_HOOK_PANICS_ENV: &str = "WARD_CATCH_HOOK_PANICS";

/// Settings for an `OperationContext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
    /// Longest a single hook call may take. `None` disables the check.
    pub hook_time_budget: Option<Duration>,
    /// Report hook panics as contract violations instead of unwinding.
    pub catch_hook_panics: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            hook_time_budget: None,
            catch_hook_panics: true,
        }
    }
}

impl ContextConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hook_time_budget(mut self, budget: Duration) -> Self {
        self.hook_time_budget = Some(budget);
        self
    }

    pub fn with_catch_hook_panics(mut self, catch: bool) -> Self {
        self.catch_hook_panics = catch;
        self
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Unparseable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(HOOK_BUDGET_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(0) => config.hook_time_budget = None,
                Ok(ms) => config.hook_time_budget = Some(Duration::from_millis(ms)),
                Err(_) => warn!(var = HOOK_BUDGET_ENV, value = %raw, "ignoring invalid hook budget"),
            }
        }

        if let Some(raw) = lookup(CATCH_HOOK_PANICS_ENV) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.catch_hook_panics = true,
                "0" | "false" | "no" | "off" => config.catch_hook_panics = false,
                _ => warn!(var = CATCH_HOOK_PANICS_ENV, value = %raw, "ignoring invalid flag"),
            }
        }

        config
    }

    pub(crate) fn hook_policy(&self) -> HookPolicy {
        HookPolicy {
            time_budget: self.hook_time_budget,
            catch_panics: self.catch_hook_panics,
        }
    }
}

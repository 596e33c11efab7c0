//! Bulk validation: resolve every authored key path and count what fails.
//!
//! Used to find references that have gone stale after a document is edited. Failures
//! go to the caller's [`ErrorPolicy`], so a check can stop at the first one or collect
//! them all.

use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::policy::ErrorPolicy;
use crate::resolver::Resolver;
use crate::utils::format_elapsed;
use crate::DbError;

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Only key paths under this prefix are checked. Empty means the whole document.
    pub root: String,
    /// Each key path is resolved once per context. Empty means once, without a context.
    pub contexts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// Number of lookups performed.
    pub checked: usize,
    /// Number of lookups that failed.
    pub failed: usize,
    pub elapsed: Duration,
}

impl CheckReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "checked {} lookups in {}: {} failure{}, result {}",
            self.checked,
            format_elapsed(self.elapsed),
            self.failed,
            if self.failed != 1 { "s" } else { "" },
            if self.is_success() { "SUCCESS" } else { "FAIL" }
        )
    }
}

/// Resolve every leaf key path under `options.root`, once per context.
///
/// Absence is allowed, since `"null"` is a legitimate authored value. Returns `Err` only
/// when `policy` decides a failure aborts the run.
pub fn check_document<P: ErrorPolicy + ?Sized>(
    resolver: &Resolver<'_>,
    policy: &mut P,
    options: &CheckOptions,
) -> Result<CheckReport, DbError> {
    let start = Instant::now();
    let keys = resolver.document().key_paths(&options.root);

    let contexts: Vec<Option<&str>> = if options.contexts.is_empty() {
        vec![None]
    } else {
        options.contexts.iter().map(|c| Some(c.as_str())).collect()
    };

    let mut checked = 0;
    let mut failed = 0;
    for context in contexts {
        info!(context = context.unwrap_or("<none>"), keys = keys.len(), "checking");
        for key in &keys {
            checked += 1;
            if resolver.lookup_with(policy, key, context, true)?.is_none() {
                failed += 1;
            }
        }
    }

    let report = CheckReport {
        checked,
        failed,
        elapsed: start.elapsed(),
    };
    if report.is_success() {
        info!("{}", report.summary());
    } else {
        error!("{}", report.summary());
    }
    Ok(report)
}

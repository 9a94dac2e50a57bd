//! The behavior pipeline (C7 half): post-analysis operations over an
//! [`crate::arparma::Arparma`], ordered by declared dependencies.

use crate::arparma::Arparma;
use crate::error::{Error, Result};
use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;

/// A post-analysis step. Behaviors are passed the `Arparma` by parameter
/// and never retain it, breaking the cyclic reference the source design
/// would otherwise create.
pub trait Behavior: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Behaviors this one depends on; they run first. Flattened and
    /// deduplicated by name before any behavior runs.
    fn requires(&self) -> Vec<Arc<dyn Behavior>> {
        Vec::new()
    }

    /// Mutates `result` in place. Return `Err(Error::BehaveCancelled)` to
    /// be silently skipped, or `Err(Error::OutBoundsBehave(..))` to mark
    /// the whole result failed.
    fn operate(&self, result: &mut Arparma) -> Result<()>;
}

/// Runs `behaviors` over `arparma` in dependency order, applying the
/// suppression rules from the error-handling design: `BehaveCancelled` is
/// absorbed, `OutBoundsBehave` demotes the result to failed and halts the
/// remaining pipeline.
pub fn execute(mut arparma: Arparma, behaviors: &[Arc<dyn Behavior>]) -> Arparma {
    let mut seen = IndexSet::new();
    let mut order: Vec<Arc<dyn Behavior>> = Vec::new();
    for b in behaviors {
        flatten(b, &mut seen, &mut order);
    }

    for behavior in order {
        match behavior.operate(&mut arparma) {
            Ok(()) => {}
            Err(Error::BehaveCancelled) => {
                tracing::trace!(behavior = behavior.name(), "behavior cancelled");
            }
            Err(Error::OutBoundsBehave(reason)) => {
                tracing::debug!(behavior = behavior.name(), %reason, "behavior rejected result");
                arparma.matched = false;
                arparma.error_info = Some(crate::arparma::ErrorInfo::OutBoundsBehave(reason));
                break;
            }
            Err(other) => {
                tracing::debug!(behavior = behavior.name(), error = %other, "behavior error suppressed");
            }
        }
    }
    arparma
}

fn flatten(behavior: &Arc<dyn Behavior>, seen: &mut IndexSet<String>, order: &mut Vec<Arc<dyn Behavior>>) {
    if seen.contains(behavior.name()) {
        return;
    }
    for dep in behavior.requires() {
        flatten(&dep, seen, order);
    }
    seen.insert(behavior.name().to_string());
    order.push(behavior.clone());
}

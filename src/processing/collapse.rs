//! Single pass collapse of sorted prefixes into a minimal covering set.

use crate::error::AggregateError;
use crate::models::{Family, Network};

/// Collapse a canonically sorted, single-family sequence.
///
/// The last pushed network is the "current" block. A network inside it is
/// dropped. A sibling of it is folded into their parent, and the parent is
/// checked again against the block before it, so merges cascade. Anything
/// else starts a new block.
///
/// Input must be sorted by base address, then prefix length (the [`Ord`] of
/// [`Network`]). Returns an error on a network of another family, or on two
/// ranges that overlap without nesting, which valid CIDR blocks cannot do.
///
/// # Arguments
/// * `family` - The address family every network must belong to
/// * `sorted` - De-duplicated networks in canonical order
///
/// # Returns
/// * `Ok(Vec<Network>)` - Disjoint, non-mergeable blocks in ascending order
/// * `Err(AggregateError)` - A foreign-family network or a partial overlap
pub fn collapse(family: Family, sorted: &[Network]) -> Result<Vec<Network>, AggregateError> {
    debug_assert!(
        sorted.windows(2).all(|w| w[0] <= w[1]),
        "collapse() input is not sorted"
    );
    let mut collapsed: Vec<Network> = Vec::with_capacity(sorted.len());

    for next in sorted {
        if next.family() != family {
            return Err(AggregateError::FamilyMismatch {
                expected: family,
                network: *next,
            });
        }

        if let Some(current) = collapsed.last() {
            if current.contains(next) {
                log::trace!("{next} is inside {current}, dropped");
                continue;
            }
            if current.overlaps(next) {
                return Err(AggregateError::PartialOverlap {
                    current: *current,
                    next: *next,
                });
            }
        }

        let mut block = *next;
        while let Some(parent) = collapsed
            .last()
            .and_then(|current| current.merge_sibling(&block))
        {
            log::trace!("merged {block} into {parent}");
            collapsed.pop();
            block = parent;
        }
        collapsed.push(block);
    }

    Ok(collapsed)
}

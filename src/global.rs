//! The process-wide current index.
//!
//! Empty until the first [`install`]; every later install swaps the whole
//! index atomically, so a reader holding an `Arc` from [`current`] keeps a
//! consistent index for as long as it likes.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::index::{BuildReport, Owner, RangeIndex};
use crate::record::{DelegationRecord, Family};


static CURRENT: ArcSwapOption<RangeIndex> = ArcSwapOption::const_empty();

/// Makes `index` current, returning the one it replaced.
pub fn install(index: RangeIndex) -> Option<Arc<RangeIndex>> {
    let previous = CURRENT.swap(Some(Arc::new(index)));
    info!("Installed new index (replaced: {})", previous.is_some());
    previous
}

pub fn current() -> Option<Arc<RangeIndex>> {
    CURRENT.load_full()
}

/// Builds from a complete record set and installs the result.
pub fn rebuild<I>(records: I) -> BuildReport
    where I: IntoIterator<Item = DelegationRecord>
{
    let (index, report) = RangeIndex::build(records);
    install(index);
    report
}

/// `None` both before the first install and when nothing covers `key`.
pub fn lookup(family: Family, key: u128) -> Option<Owner> {
    current().and_then(|index| index.lookup(family, key))
}

pub fn clear() -> Option<Arc<RangeIndex>> {
    CURRENT.swap(None)
}

//! Temporal distance between shots and gap-based cluster splitting.

use scn_models::ShotId;

use crate::error::CoreResult;

/// Default maximum ordinal gap allowed inside one group.
pub const DEFAULT_SPLIT_THRESHOLD: u64 = 10;

/// Absolute difference of the two shots' ordinals.
pub fn distance(a: &ShotId, b: &ShotId) -> CoreResult<u64> {
    Ok(a.ordinal()?.abs_diff(b.ordinal()?))
}

/// Stable sort by ordinal. Fails on the first unparseable id.
pub fn sort_by_ordinal(shots: &mut Vec<ShotId>) -> CoreResult<()> {
    let mut keyed = shots
        .drain(..)
        .map(|shot| shot.ordinal().map(|n| (n, shot)))
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by_key(|(n, _)| *n);
    shots.extend(keyed.into_iter().map(|(_, shot)| shot));
    Ok(())
}

/// Split shots into maximal runs whose consecutive ordinal gaps stay within `threshold`.
///
/// Zero or one shot is returned as a single group untouched. Otherwise the
/// groups come back in ascending temporal order.
pub fn split(shots: &[ShotId], threshold: u64) -> CoreResult<Vec<Vec<ShotId>>> {
    if shots.len() <= 1 {
        return Ok(vec![shots.to_vec()]);
    }

    let mut sorted = shots.to_vec();
    sort_by_ordinal(&mut sorted)?;

    let mut groups = Vec::new();
    let mut iter = sorted.into_iter();
    let mut current = Vec::new();
    if let Some(first) = iter.next() {
        current.push(first);
    }

    for shot in iter {
        let gap = match current.last() {
            Some(prev) => distance(prev, &shot)?,
            None => 0,
        };
        if gap > threshold {
            groups.push(std::mem::take(&mut current));
        }
        current.push(shot);
    }
    groups.push(current);

    Ok(groups)
}

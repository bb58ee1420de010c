//! Deterministic warrior placement: `posit` (uniform, retry-bounded) with a
//! fallback to `npos` (Fisher-Yates shuffle of cumulative offsets).

use crate::rng::draw;

/// Per-slot retry budget for [`posit`].
const RETRIES1: u32 = 20;

/// Rollback budget for [`posit`] before falling back to [`npos`].
const RETRIES2: u32 = 4;

/// Place `n` warriors in a core of `core_size` cells such that every pair's
/// circular distance is at least `separation`. Returns the positions (with
/// `positions[0] == 0`) and the RNG seed advanced by however many draws
/// placement consumed.
#[must_use]
pub fn position_warriors(
    n: usize,
    core_size: u32,
    separation: u32,
    seed: i64,
) -> (Vec<u32>, i64) {
    match n {
        0 => (Vec::new(), seed),
        1 => (vec![0], seed),
        2 => {
            let range = i64::from(core_size) + 1 - 2 * i64::from(separation);
            let mut seed = seed;
            let offset = draw(&mut seed, range.max(1));
            let position = i64::from(separation) + offset;
            (
                vec![0, u32::try_from(position).unwrap_or(0)],
                seed,
            )
        }
        _ => posit(n, core_size, separation, seed)
            .unwrap_or_else(|| npos(n, core_size, separation, seed)),
    }
}

/// Circular distance between two core addresses.
fn circular_distance(a: u32, b: u32, core_size: u32) -> u32 {
    let diff = a.abs_diff(b);
    diff.min(core_size.saturating_sub(diff))
}

/// Iteratively place warriors `1..n` uniformly in `[separation, core_size -
/// separation]`, retrying a fixed number of times per slot and rolling back
/// on repeated overlap. Returns `None` if both retry budgets exhaust.
fn posit(
    n: usize,
    core_size: u32,
    separation: u32,
    seed: i64,
) -> Option<(Vec<u32>, i64)> {
    let lo = i64::from(separation);
    let hi = i64::from(core_size) - i64::from(separation);
    let range = hi - lo + 1;
    if range <= 0 {
        return None;
    }

    let mut positions = vec![0_u32; n];
    let mut seed = seed;
    let mut slot = 1_usize;
    let mut retries2 = RETRIES2;

    while slot < n {
        let mut placed = false;
        for _ in 0..RETRIES1 {
            let offset = draw(&mut seed, range);
            let candidate = u32::try_from(lo + offset).unwrap_or(0);
            let overlaps = positions[..slot]
                .iter()
                .any(|&p| circular_distance(candidate, p, core_size) < separation);
            if !overlaps {
                positions[slot] = candidate;
                placed = true;
                break;
            }
        }
        if placed {
            slot += 1;
        } else if slot > 1 && retries2 > 0 {
            retries2 -= 1;
            slot -= 1;
        } else {
            return None;
        }
    }
    Some((positions, seed))
}

/// Draw `n-1` offsets, sort them, space them out by `separation`, then
/// shuffle the non-zero slots so any warrior can land in any slot.
fn npos(n: usize, core_size: u32, separation: u32, seed: i64) -> (Vec<u32>, i64) {
    let range =
        i64::from(core_size) - i64::from(n as u32) * i64::from(separation) + 1;
    let mut seed = seed;
    let mut offsets: Vec<i64> = (0..n - 1).map(|_| draw(&mut seed, range.max(1))).collect();
    offsets.sort_unstable();

    let mut positions = vec![0_u32; n];
    for (idx, offset) in offsets.iter().enumerate() {
        let cumulative = offset + i64::from(separation) * i64::try_from(idx + 1).unwrap_or(0);
        positions[idx + 1] = u32::try_from(cumulative.rem_euclid(i64::from(core_size))).unwrap_or(0);
    }

    for i in (1..n).rev() {
        let j = 1 + usize::try_from(draw(&mut seed, i64::try_from(i).unwrap_or(1))).unwrap_or(0);
        positions.swap(i, j);
    }

    (positions, seed)
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;

    use super::{circular_distance, position_warriors};

    fn min_pairwise_distance(positions: &[u32], core_size: u32) -> u32 {
        let mut min = u32::MAX;
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                min = min.min(circular_distance(positions[i], positions[j], core_size));
            }
        }
        min
    }

    #[test]
    fn single_warrior_is_at_zero() {
        let (positions, seed) = position_warriors(1, 8000, 100, 42);
        assert_eq!(positions, vec![0]);
        assert_eq!(seed, 42);
    }

    #[test]
    fn two_warriors_respect_separation_and_advance_seed() {
        let (positions, seed) = position_warriors(2, 8000, 100, 42);
        assert_eq!(positions[0], 0);
        assert!(positions[1] >= 100);
        assert_ne!(seed, 42);
    }

    #[test]
    fn many_warriors_all_respect_separation() {
        let (positions, _seed) = position_warriors(6, 8000, 100, 123_456);
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[0], 0);
        assert!(min_pairwise_distance(&positions, 8000) >= 100);
    }

    #[test]
    fn npos_fallback_still_respects_minimum_spacing() {
        // A separation tight enough that posit's retry budget is very likely
        // to exhaust, forcing the npos fallback, which builds positions
        // constructively and therefore always respects the spacing.
        let (positions, _seed) = position_warriors(10, 2000, 100, 7);
        assert_eq!(positions[0], 0);
        assert_eq!(positions.len(), 10);
        assert!(min_pairwise_distance(&positions, 2000) >= 100);
    }
}

//! Serial size distribution.
//!
//! Distributes a target length over a row of entries that each have a
//! min/preferred/max size and a [`ResizeConstraint`]. Every axis of the grid,
//! every spanning-component reconciliation and every in-cell group layout
//! ends up here.

use trellis_core::{round_px, MinPrefMax, ResizeConstraint, SizeType, MAX, MIN, NOT_SET};

/// Returns the violated boundary when `size` lies outside `[min, max]`.
///
/// An unset min acts as 0 and an unset max as unbounded.
pub fn broken_boundary(size: f32, min: i32, max: i32) -> Option<i32> {
    if min != NOT_SET {
        if size < min as f32 {
            return Some(min);
        }
    } else if size < 0.0 {
        return Some(0);
    }
    if max != NOT_SET && size > max as f32 {
        return Some(max);
    }
    None
}

/// Rounds float sizes so the rounded sizes sum to the rounded total.
///
/// The running position is rounded rather than each size, so no drift
/// accumulates.
pub fn round_sizes(sizes: &[f32]) -> Vec<i32> {
    let mut pos = 0.0f32;
    sizes
        .iter()
        .map(|&size| {
            let start = round_px(pos);
            pos += size;
            round_px(pos) - start
        })
        .collect()
}

fn index_safe<T: Copy>(items: &[Option<T>], ix: usize) -> Option<T> {
    match items.get(ix) {
        Some(item) => *item,
        None => items.last().copied().flatten(),
    }
}

/// Distributes `target` over `sizes`.
///
/// Every entry starts at its `start` size (usually preferred), snapped into
/// its bounds. The difference to `target` is then handed out by priority,
/// lower numbers first, proportionally to each entry's weight within a
/// priority. Entries that reach a bound are pinned and the remainder goes to
/// the rest of the bucket. When growing with `push_weights`, a second round
/// gives entries without a grow weight the push weight at their index.
///
/// Entries that are `None` get size 0 and take no part. Whatever cannot be
/// absorbed is left unapplied.
pub fn calculate_serial(
    sizes: &[Option<MinPrefMax>],
    constraints: &[Option<ResizeConstraint>],
    push_weights: Option<&[Option<f32>]>,
    start: SizeType,
    target: i32,
) -> Vec<i32> {
    let n = sizes.len();
    let mut lengths = vec![0.0f32; n];
    let mut used = 0.0f32;

    for (len, size) in lengths.iter_mut().zip(sizes) {
        let Some(size) = size else { continue };
        let raw = size[start.index()];
        let mut l = if raw != NOT_SET { raw as f32 } else { 0.0 };
        if let Some(bound) = broken_boundary(l, size[MIN], size[MAX]) {
            l = bound as f32;
        }
        used += l;
        *len = l;
    }

    let used_rounded = round_px(used);
    if used_rounded != target && !constraints.is_empty() {
        let growing = used_rounded < target;

        let mut priorities: Vec<i32> = (0..n)
            .filter(|&i| sizes[i].is_some())
            .filter_map(|i| index_safe(constraints, i))
            .map(|rc| rc.priority(growing))
            .collect();
        priorities.sort_unstable();
        priorities.dedup();

        let rounds = if growing && push_weights.is_some() { 2 } else { 1 };
        for round in 0..rounds {
            for &priority in &priorities {
                let mut weights = vec![None; n];
                let mut total = 0.0f32;
                for (i, weight) in weights.iter_mut().enumerate() {
                    if sizes[i].is_none() {
                        continue;
                    }
                    let Some(rc) = index_safe(constraints, i) else {
                        continue;
                    };
                    if rc.priority(growing) != priority {
                        continue;
                    }
                    let w = match (growing, rc.grow) {
                        (true, None) if round > 0 => push_weights.and_then(|p| index_safe(p, i)),
                        _ => rc.weight(growing),
                    };
                    if let Some(w) = w.filter(|&w| w > 0.0) {
                        total += w;
                        *weight = Some(w);
                    }
                }

                tracing::trace!(priority, growing, round, total, "distributing bucket");

                while total > 0.0001 {
                    let to_change = target as f32 - used;
                    let mut hit = false;
                    let mut pinned_weight = 0.0f32;
                    for i in 0..n {
                        let (Some(w), Some(size)) = (weights[i], sizes[i]) else {
                            continue;
                        };
                        let mut delta = to_change * w / total;
                        let mut new_len = lengths[i] + delta;
                        if let Some(bound) = broken_boundary(new_len, size[MIN], size[MAX]) {
                            pinned_weight += w;
                            weights[i] = None;
                            hit = true;
                            new_len = bound as f32;
                            delta = new_len - lengths[i];
                        }
                        lengths[i] = new_len;
                        used += delta;
                    }
                    total -= pinned_weight;
                    if !hit {
                        break;
                    }
                }
            }
        }
    }

    round_sizes(&lengths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use trellis_core::INF;

    const GROW: ResizeConstraint = ResizeConstraint::new(100, Some(100.0), 100, Some(100.0));

    fn sz(min: i32, pref: i32, max: i32) -> Option<MinPrefMax> {
        Some([min, pref, max])
    }

    #[test]
    fn test_broken_boundary() {
        assert_eq!(broken_boundary(5.0, 10, 20), Some(10));
        assert_eq!(broken_boundary(25.0, 10, 20), Some(20));
        assert_eq!(broken_boundary(15.0, 10, 20), None);
        assert_eq!(broken_boundary(-1.0, NOT_SET, NOT_SET), Some(0));
        assert_eq!(broken_boundary(1e6, NOT_SET, NOT_SET), None);
    }

    #[test]
    fn test_round_sizes_carries_remainder() {
        let rounded = round_sizes(&[33.4, 33.3, 33.3]);
        assert_eq!(rounded.iter().sum::<i32>(), 100);
        assert_eq!(rounded, vec![33, 34, 33]);
        assert!(round_sizes(&[]).is_empty());
    }

    #[test]
    fn test_no_change_at_preferred() {
        let sizes = [sz(0, 50, INF), sz(0, 70, INF)];
        let rcs = [Some(GROW), Some(GROW)];
        assert_eq!(calculate_serial(&sizes, &rcs, None, SizeType::Pref, 120), vec![50, 70]);
    }

    #[test]
    fn test_even_grow() {
        let sizes = [sz(0, 50, INF), sz(0, 50, INF)];
        let rcs = [Some(GROW), Some(GROW)];
        assert_eq!(calculate_serial(&sizes, &rcs, None, SizeType::Pref, 200), vec![100, 100]);
    }

    #[test]
    fn test_fixed_entry_keeps_size() {
        let sizes = [sz(50, 50, 50), sz(0, 50, INF)];
        let rcs = [Some(GROW), Some(GROW)];
        assert_eq!(calculate_serial(&sizes, &rcs, None, SizeType::Pref, 150), vec![50, 100]);
    }

    #[test]
    fn test_weighted_grow() {
        let light = ResizeConstraint::new(100, Some(100.0), 100, Some(100.0));
        let heavy = ResizeConstraint::new(100, Some(100.0), 100, Some(300.0));
        let sizes = [sz(0, 0, INF), sz(0, 0, INF)];
        let result = calculate_serial(&sizes, &[Some(light), Some(heavy)], None, SizeType::Pref, 400);
        assert_eq!(result, vec![100, 300]);
    }

    #[test]
    fn test_lower_priority_number_grows_first() {
        let first = ResizeConstraint::new(100, Some(100.0), 0, Some(100.0));
        let later = ResizeConstraint::new(100, Some(100.0), 100, Some(100.0));
        let sizes = [sz(0, 10, INF), sz(0, 10, INF)];
        let result = calculate_serial(&sizes, &[Some(first), Some(later)], None, SizeType::Pref, 100);
        assert_eq!(result, vec![90, 10]);
    }

    #[test]
    fn test_bucket_overflow_moves_to_next_priority() {
        let first = ResizeConstraint::new(100, Some(100.0), 0, Some(100.0));
        let later = ResizeConstraint::new(100, Some(100.0), 100, Some(100.0));
        let sizes = [sz(0, 10, 40), sz(0, 10, INF)];
        let result = calculate_serial(&sizes, &[Some(first), Some(later)], None, SizeType::Pref, 100);
        assert_eq!(result, vec![40, 60]);
    }

    #[test]
    fn test_pinned_remainder_redistributed() {
        let sizes = [sz(0, 0, 10), sz(0, 0, INF), sz(0, 0, INF)];
        let rcs = [Some(GROW); 3];
        let result = calculate_serial(&sizes, &rcs, None, SizeType::Pref, 90);
        assert_eq!(result, vec![10, 40, 40]);
    }

    #[test]
    fn test_shrink_to_min() {
        let sizes = [sz(30, 100, INF), sz(0, 100, INF)];
        let rcs = [Some(ResizeConstraint::default()); 2];
        let result = calculate_serial(&sizes, &rcs, None, SizeType::Pref, 100);
        assert_eq!(result, vec![50, 50]);
        let result = calculate_serial(&sizes, &rcs, None, SizeType::Pref, 40);
        assert_eq!(result, vec![30, 10]);
    }

    #[test]
    fn test_no_shrink_weight_keeps_size() {
        let rigid = ResizeConstraint::new(100, None, 100, None);
        let sizes = [sz(0, 100, INF), sz(0, 100, INF)];
        let result = calculate_serial(
            &sizes,
            &[Some(rigid), Some(ResizeConstraint::default())],
            None,
            SizeType::Pref,
            150,
        );
        assert_eq!(result, vec![100, 50]);
    }

    #[test]
    fn test_push_weights_second_round() {
        let sizes = [sz(0, 10, INF), sz(0, 10, INF)];
        let rcs = [Some(ResizeConstraint::default()); 2];
        let push = [None, Some(100.0)];
        let result = calculate_serial(&sizes, &rcs, Some(&push), SizeType::Pref, 100);
        assert_eq!(result, vec![10, 90]);
    }

    #[test]
    fn test_unabsorbable_slack_left_unapplied() {
        let sizes = [sz(0, 10, 20)];
        let result = calculate_serial(&sizes, &[Some(GROW)], None, SizeType::Pref, 100);
        assert_eq!(result, vec![20]);
    }

    #[test]
    fn test_none_entries_skipped() {
        let sizes = [sz(0, 10, INF), None, sz(0, 10, INF)];
        let rcs = [Some(GROW), Some(GROW), None];
        let result = calculate_serial(&sizes, &rcs, None, SizeType::Pref, 50);
        assert_eq!(result, vec![40, 0, 10]);
    }

    #[test]
    fn test_min_start_and_unset_pref() {
        let sizes = [sz(20, NOT_SET, INF), sz(NOT_SET, NOT_SET, NOT_SET)];
        let result = calculate_serial(&sizes, &[], None, SizeType::Pref, 500);
        assert_eq!(result, vec![20, 0]);
        let result = calculate_serial(&sizes, &[], None, SizeType::Min, 500);
        assert_eq!(result, vec![20, 0]);
    }

    fn entry() -> impl Strategy<Value = (i32, i32, i32, bool, u8, u8)> {
        (0..200i32, 0..200i32, 0..400i32, any::<bool>(), 0..3u8, 1..4u8)
    }

    proptest! {
        #[test]
        fn prop_sum_matches_target_when_absorbable(
            entries in prop::collection::vec(entry(), 1..8),
            target in 0..1500i32,
        ) {
            let sizes: Vec<_> = entries
                .iter()
                .map(|&(a, b, _, _, _, _)| Some([0, a.min(b), INF]))
                .collect();
            let rcs: Vec<_> = entries
                .iter()
                .map(|&(_, _, _, _, prio, weight)| {
                    let w = Some(f32::from(weight) * 50.0);
                    Some(ResizeConstraint::new(i32::from(prio) * 10, w, i32::from(prio) * 10, w))
                })
                .collect();
            let result = calculate_serial(&sizes, &rcs, None, SizeType::Pref, target);
            prop_assert_eq!(result.iter().sum::<i32>(), target);
        }

        #[test]
        fn prop_sizes_stay_in_bounds(
            entries in prop::collection::vec(entry(), 1..8),
            target in 0..2000i32,
        ) {
            let sizes: Vec<_> = entries
                .iter()
                .map(|&(a, b, c, _, _, _)| {
                    let min = a.min(b);
                    let pref = a.max(b);
                    Some([min, pref, pref.max(c)])
                })
                .collect();
            let rcs: Vec<_> = entries
                .iter()
                .map(|&(_, _, _, grows, prio, weight)| {
                    let w = f32::from(weight) * 25.0;
                    Some(ResizeConstraint::new(i32::from(prio), Some(w), i32::from(prio), grows.then_some(w)))
                })
                .collect();
            let result = calculate_serial(&sizes, &rcs, None, SizeType::Pref, target);
            for (size, got) in sizes.iter().zip(&result) {
                let [min, _, max] = size.unwrap();
                prop_assert!(*got >= min && *got <= max, "{} not in [{}, {}]", got, min, max);
            }
        }

        #[test]
        fn prop_round_sizes_preserves_total(values in prop::collection::vec(0.0f32..500.0, 0..12)) {
            let total: f32 = values.iter().fold(0.0, |acc, v| acc + v);
            let rounded = round_sizes(&values);
            prop_assert_eq!(rounded.iter().sum::<i32>(), round_px(total));
        }
    }
}

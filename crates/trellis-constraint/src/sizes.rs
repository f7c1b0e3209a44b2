//! Helpers for min/preferred/max triples.

use trellis_core::{MinPrefMax, INF, MAX, MIN, NOT_SET, PREF};

pub fn sum(values: &[i32]) -> i32 {
    values.iter().sum()
}

/// Clamps a size into `[0, INF]`, mapping [`NOT_SET`] to 0.
pub fn constrain_size(size: i32) -> i32 {
    if size == NOT_SET {
        0
    } else {
        size.clamp(0, INF)
    }
}

/// Lowers min to max and keeps preferred between them. Unset slots are left alone.
pub fn correct_min_max(sizes: &mut MinPrefMax) {
    let min_set = sizes[MIN] != NOT_SET;
    let max_set = sizes[MAX] != NOT_SET;
    if min_set && max_set && sizes[MIN] > sizes[MAX] {
        sizes[MIN] = sizes[MAX];
    }
    if sizes[PREF] != NOT_SET {
        if min_set && sizes[PREF] < sizes[MIN] {
            sizes[PREF] = sizes[MIN];
        }
        if max_set && sizes[PREF] > sizes[MAX] {
            sizes[PREF] = sizes[MAX];
        }
    }
}

/// Element-wise max (`to_max`) or min of two triples, ignoring unset slots.
pub fn merge_sizes(a: Option<MinPrefMax>, b: Option<MinPrefMax>, to_max: bool) -> Option<MinPrefMax> {
    let (Some(mut a), Some(b)) = (a, b) else {
        return a.or(b);
    };
    for (x, &y) in a.iter_mut().zip(&b) {
        if y == NOT_SET {
            continue;
        }
        if *x == NOT_SET {
            *x = y;
        } else {
            *x = if to_max { (*x).max(y) } else { (*x).min(y) };
        }
    }
    Some(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constrain_size() {
        assert_eq!(constrain_size(NOT_SET), 0);
        assert_eq!(constrain_size(-5), 0);
        assert_eq!(constrain_size(INF + 10), INF);
        assert_eq!(constrain_size(42), 42);
    }

    #[test]
    fn test_correct_min_max() {
        let mut s = [50, 10, 20];
        correct_min_max(&mut s);
        assert_eq!(s, [20, 20, 20]);

        let mut s = [NOT_SET, 100, 60];
        correct_min_max(&mut s);
        assert_eq!(s, [NOT_SET, 60, 60]);
    }

    #[test]
    fn test_merge_sizes() {
        assert_eq!(merge_sizes(None, Some([1, 2, 3]), true), Some([1, 2, 3]));
        assert_eq!(
            merge_sizes(Some([1, 5, NOT_SET]), Some([4, 2, 9]), true),
            Some([4, 5, 9])
        );
        assert_eq!(merge_sizes(Some([1, 5, 9]), Some([4, 2, 3]), false), Some([1, 2, 3]));
        assert_eq!(sum(&[1, 2, 3]), 6);
    }
}

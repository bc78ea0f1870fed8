//! Ordering of point ids by distance from the seed circumcenter

use glam::DVec2;

/// Partitions at or below this length are finished with insertion sort
const INSERTION_SORT_LEN: usize = 21;

/// Sort `ids` by squared distance of their points to `center`
///
/// Ties are broken by `x`, then `y`, so the order is fully determined by the
/// coordinates.
pub(crate) fn sort_by_distance(ids: &mut [usize], coords: &[DVec2], center: DVec2) {
    let compare = |i: usize, j: usize| {
        let (a, b) = (coords[i], coords[j]);
        let diff = a.distance_squared(center) - b.distance_squared(center);
        if diff != 0.0 {
            return diff;
        }
        let diff = a.x - b.x;
        if diff != 0.0 {
            return diff;
        }
        a.y - b.y
    };
    quicksort(ids, &compare);
}

/// Median-of-three quicksort over a comparator returning a signed difference
///
/// Recurses into the smaller partition and loops on the larger one, keeping
/// the stack depth logarithmic.
fn quicksort<F>(mut ids: &mut [usize], compare: &F)
where
    F: Fn(usize, usize) -> f64,
{
    loop {
        let len = ids.len();
        if len <= INSERTION_SORT_LEN {
            insertion_sort(ids, compare);
            return;
        }

        let right = len - 1;
        let median = right / 2;
        let mut i = 1;
        let mut j = right;
        ids.swap(median, i);
        if compare(ids[0], ids[right]) > 0.0 {
            ids.swap(0, right);
        }
        if compare(ids[i], ids[right]) > 0.0 {
            ids.swap(i, right);
        }
        if compare(ids[0], ids[i]) > 0.0 {
            ids.swap(0, i);
        }

        let pivot = ids[i];
        loop {
            i += 1;
            while compare(ids[i], pivot) < 0.0 {
                i += 1;
            }
            j -= 1;
            while compare(ids[j], pivot) > 0.0 {
                j -= 1;
            }
            if j < i {
                break;
            }
            ids.swap(i, j);
        }
        ids[1] = ids[j];
        ids[j] = pivot;

        let (lower, upper) = std::mem::take(&mut ids).split_at_mut(i);
        let lower = &mut lower[..j];
        if upper.len() >= lower.len() {
            quicksort(lower, compare);
            ids = upper;
        } else {
            quicksort(upper, compare);
            ids = lower;
        }
    }
}

fn insertion_sort<F>(ids: &mut [usize], compare: &F)
where
    F: Fn(usize, usize) -> f64,
{
    for i in 1..ids.len() {
        let id = ids[i];
        let mut j = i;
        while j > 0 && compare(ids[j - 1], id) > 0.0 {
            ids[j] = ids[j - 1];
            j -= 1;
        }
        ids[j] = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn assert_sorted(ids: &[usize], coords: &[DVec2], center: DVec2) {
        for pair in ids.windows(2) {
            let (a, b) = (coords[pair[0]], coords[pair[1]]);
            let key_a = (a.distance_squared(center), a.x, a.y);
            let key_b = (b.distance_squared(center), b.x, b.y);
            assert!(key_a <= key_b, "{:?} before {:?}", key_a, key_b);
        }
    }

    #[test]
    fn test_sort_small_input() {
        let coords = vec![
            DVec2::new(3.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(2.0, 0.0),
        ];
        let mut ids = vec![0, 1, 2];
        sort_by_distance(&mut ids, &coords, DVec2::ZERO);
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[test]
    fn test_sort_large_random_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let coords: Vec<DVec2> = (0..2_000)
            .map(|_| DVec2::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)))
            .collect();
        let mut ids: Vec<usize> = (0..coords.len()).collect();
        let center = DVec2::new(3.0, -4.0);
        sort_by_distance(&mut ids, &coords, center);

        assert_sorted(&ids, &coords, center);
        let mut seen = ids.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..coords.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_ties_break_on_coordinates() {
        // every point on the unit circle, so only the tie-break orders them
        let coords: Vec<DVec2> = (0..64)
            .map(|k| {
                let theta = k as f64 * std::f64::consts::TAU / 64.0;
                DVec2::new(theta.cos(), theta.sin())
            })
            .collect();
        let mut ids: Vec<usize> = (0..coords.len()).rev().collect();
        sort_by_distance(&mut ids, &coords, DVec2::ZERO);
        assert_sorted(&ids, &coords, DVec2::ZERO);
    }

    #[test]
    fn test_sort_many_duplicates() {
        let coords: Vec<DVec2> = (0..100)
            .map(|k| DVec2::new((k % 3) as f64, 0.0))
            .collect();
        let mut ids: Vec<usize> = (0..coords.len()).collect();
        sort_by_distance(&mut ids, &coords, DVec2::ZERO);
        assert_sorted(&ids, &coords, DVec2::ZERO);
    }
}

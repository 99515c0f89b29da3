//! Tolerance-aware point ordering used to merge coincident vertices.

use std::cmp::Ordering;

use camsim_math::{Point3, Scalar};

/// Lexicographic x, y, z comparison where coordinates within `precision`
/// count as equal.
///
/// This is not a total order (equality is not transitive), which is why
/// sorting goes through [`merge_sort_indices`] instead of `slice::sort_by`.
pub fn compare_points<T: Scalar>(a: &Point3<T>, b: &Point3<T>, precision: T) -> Ordering {
    for (x, y) in a.to_array().into_iter().zip(b.to_array()) {
        if (x - y).abs() > precision {
            return if x < y { Ordering::Less } else { Ordering::Greater };
        }
    }
    Ordering::Equal
}

/// Stable top-down merge sort of `0..points.len()` by [`compare_points`].
pub(crate) fn merge_sort_indices<T: Scalar>(points: &[Point3<T>], precision: T) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    let mut scratch = order.clone();
    sort_range(&mut order, &mut scratch, points, precision);
    order
}

fn sort_range<T: Scalar>(
    order: &mut [usize],
    scratch: &mut [usize],
    points: &[Point3<T>],
    precision: T,
) {
    let n = order.len();
    if n < 2 {
        return;
    }
    let mid = n / 2;
    {
        let (left, right) = order.split_at_mut(mid);
        let (sl, sr) = scratch.split_at_mut(mid);
        sort_range(left, sl, points, precision);
        sort_range(right, sr, points, precision);
    }
    let (mut i, mut j, mut k) = (0, mid, 0);
    while i < mid && j < n {
        let take_right =
            compare_points(&points[order[j]], &points[order[i]], precision) == Ordering::Less;
        if take_right {
            scratch[k] = order[j];
            j += 1;
        } else {
            scratch[k] = order[i];
            i += 1;
        }
        k += 1;
    }
    scratch[k..k + mid - i].copy_from_slice(&order[i..mid]);
    k += mid - i;
    scratch[k..].copy_from_slice(&order[j..n]);
    order.copy_from_slice(scratch);
}

/// Walk points in `order`, mapping each run of coordinate-equal points to
/// one new index.
///
/// Each run is anchored at its first point: a point joins the run while it
/// stays within `precision` of that anchor per coordinate. Pairs the sort
/// separated are then joined by [`weld_close`]. Returns the old-to-new index
/// map and the canonical points.
pub(crate) fn collapse_sorted<T: Scalar>(
    points: &[Point3<T>],
    order: &[usize],
    precision: T,
) -> (Vec<usize>, Vec<Point3<T>>) {
    let mut remap = vec![0; points.len()];
    let mut unique: Vec<Point3<T>> = Vec::new();
    for &idx in order {
        let p = points[idx];
        match unique.last() {
            Some(anchor) if anchor.coordinates_equal(&p, precision) => {}
            _ => unique.push(p),
        }
        remap[idx] = unique.len() - 1;
    }
    let (weld, unique) = weld_close(unique, precision);
    for r in &mut remap {
        *r = weld[*r];
    }
    (remap, unique)
}

/// Union every pair of points within `precision` per coordinate.
///
/// The tolerant ordering can sort a third point between two coincident
/// ones, so a run-based collapse alone may leave close pairs behind. This
/// sweeps the points by x, only looking `precision` ahead, and joins pairs
/// with a union-find. Each group keeps its lowest-index point. Returns the
/// old-to-new index map and the surviving points in index order.
pub(crate) fn weld_close<T: Scalar>(
    points: Vec<Point3<T>>,
    precision: T,
) -> (Vec<usize>, Vec<Point3<T>>) {
    let n = points.len();
    let mut by_x: Vec<usize> = (0..n).collect();
    by_x.sort_by(|&a, &b| {
        points[a]
            .x
            .partial_cmp(&points[b].x)
            .unwrap_or(Ordering::Equal)
    });
    let mut parent: Vec<usize> = (0..n).collect();
    let mut joined = 0;
    for (k, &i) in by_x.iter().enumerate() {
        for &j in &by_x[k + 1..] {
            if points[j].x - points[i].x > precision {
                break;
            }
            if !points[i].coordinates_equal(&points[j], precision) {
                continue;
            }
            let (ri, rj) = (find_root(&mut parent, i), find_root(&mut parent, j));
            if ri != rj {
                parent[ri.max(rj)] = ri.min(rj);
                joined += 1;
            }
        }
    }
    if joined == 0 {
        return ((0..n).collect(), points);
    }
    let mut slot: Vec<Option<usize>> = vec![None; n];
    let mut kept = Vec::with_capacity(n - joined);
    let mut remap = Vec::with_capacity(n);
    for i in 0..n {
        let root = find_root(&mut parent, i);
        remap.push(*slot[root].get_or_insert_with(|| {
            kept.push(points[root]);
            kept.len() - 1
        }));
    }
    (remap, kept)
}

fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

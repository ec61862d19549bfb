use std::f64::consts::PI;

use crate::color;

use super::error::DataError;
use super::model::{HistogramBundle, HistogramEntry, RawSample};

// ---------------------------------------------------------------------------
// Spherical conversion
// ---------------------------------------------------------------------------

/// Floor for `1 - z²` in the Jacobian weight, so moments aligned with the
/// z-axis get a large finite weight (1e6) instead of a division by zero.
pub const WEIGHT_EPS: f64 = 1e-12;

/// How far outside [-1, 1] a z-component may stray (floating noise from the
/// simulation) before it is treated as corrupt input rather than clamped.
const Z_TOLERANCE: f64 = 1e-6;

/// One moment converted to spherical angles under the physical convention.
#[derive(Debug, Clone, Copy)]
struct SphericalSample {
    /// Site-type discriminator (the magnitude column).
    key: f64,
    /// Azimuth in (-π, π]. `atan2(0, 0)` is defined as 0, so a moment along
    /// the z-axis gets phi = 0.
    phi: f64,
    /// Polar elevation angle in [0, π].
    theta: f64,
    /// Jacobian correction for the nonlinear z → theta transform.
    weight: f64,
}

/// Density-correction factor `1 / sqrt(1 - z²)`, floored by [`WEIGHT_EPS`].
/// Always ≥ 1 for z in [-1, 1], growing monotonically as |z| → 1.
pub fn jacobian_weight(z: f64) -> f64 {
    1.0 / (1.0 - z * z).max(WEIGHT_EPS).sqrt()
}

fn to_spherical(samples: &[RawSample]) -> Result<Vec<SphericalSample>, DataError> {
    samples
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let [x, y, z] = s.moment;
            // A NaN or infinite component would otherwise sail through the
            // z-range check (every comparison on NaN is false) and corrupt
            // the binning downstream.
            if let Some(&value) = [x, y, z].iter().find(|c| !c.is_finite()) {
                return Err(DataError::NumericDomain { index, value });
            }
            if z.abs() > 1.0 + Z_TOLERANCE {
                return Err(DataError::NumericDomain { index, value: z });
            }
            let z = z.clamp(-1.0, 1.0);
            Ok(SphericalSample {
                key: s.magnitude,
                phi: y.atan2(x),
                theta: z.acos(),
                weight: jacobian_weight(z),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Site-type grouping
// ---------------------------------------------------------------------------

/// Distinct values of `values` in ascending order (NaN sorts last).
pub fn sorted_unique(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.into_iter().collect();
    v.sort_by(|a, b| a.total_cmp(b));
    v.dedup_by(|a, b| a.total_cmp(b).is_eq());
    v
}

/// A partition of the sample indices into site-type groups.
struct Grouping {
    labels: Vec<String>,
    members: Vec<Vec<usize>>,
}

/// Partition samples into site-type groups.
///
/// `num_groups == 0` infers the groups from the distinct discriminator
/// values (one group per distinct moment magnitude, in ascending order).
/// Inferred labels use Rust float formatting, so a whole magnitude shows as
/// `3` rather than `3.0`; labels are editable in the UI anyway.
/// `num_groups == N > 0` stripes the samples instead: flat index j goes to
/// group `j mod N`, matching the interleaved site layout of restart files,
/// with labels `1..=N`.
fn group_samples(spherical: &[SphericalSample], num_groups: usize) -> Grouping {
    if num_groups == 0 {
        let keys = sorted_unique(spherical.iter().map(|s| s.key));
        let mut members = vec![Vec::new(); keys.len()];
        for (j, s) in spherical.iter().enumerate() {
            let g = keys
                .iter()
                .position(|k| k.total_cmp(&s.key).is_eq())
                .unwrap_or(0);
            members[g].push(j);
        }
        Grouping {
            labels: keys.iter().map(|k| k.to_string()).collect(),
            members,
        }
    } else {
        Grouping {
            labels: (1..=num_groups).map(|i| i.to_string()).collect(),
            members: (0..num_groups)
                .map(|i| (i..spherical.len()).step_by(num_groups).collect())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Binning
// ---------------------------------------------------------------------------

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            if i + 1 == n {
                end
            } else {
                start + (end - start) * i as f64 / (n - 1) as f64
            }
        })
        .collect()
}

/// Bin index for `v` among sorted `edges`, or `None` when out of range or
/// NaN. The last bin is closed on both sides, so `v == edges.last()` counts.
fn bin_index(edges: &[f64], v: f64) -> Option<usize> {
    let n = edges.len();
    // Negated comparisons so NaN falls out of range instead of reaching the
    // partition below.
    if n < 2 || !(v >= edges[0]) || !(v <= edges[n - 1]) {
        return None;
    }
    if v == edges[n - 1] {
        return Some(n - 2);
    }
    Some(edges.partition_point(|e| *e <= v) - 1)
}

/// Accumulate weighted counts of `(value, weight)` pairs into the bins
/// defined by `edges`.
fn histogram(pairs: impl IntoIterator<Item = (f64, f64)>, edges: &[f64]) -> Vec<f64> {
    let mut counts = vec![0.0; edges.len() - 1];
    for (v, w) in pairs {
        if let Some(i) = bin_index(edges, v) {
            counts[i] += w;
        }
    }
    counts
}

/// Divide by the maximum count. `false` when the histogram is all zero and
/// normalization is undefined.
fn max_normalize(counts: &mut [f64]) -> bool {
    let max = counts.iter().cloned().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return false;
    }
    for c in counts.iter_mut() {
        *c /= max;
    }
    true
}

// ---------------------------------------------------------------------------
// Step-plot doubling
// ---------------------------------------------------------------------------

/// Duplicate each interior edge: `[e0, e1, e1, ..., e_{n-1}, e_{n-1}, e_n]`.
/// Output length is twice the bin count.
fn double_edges(edges: &[f64]) -> Vec<f64> {
    let n = edges.len();
    let mut out = Vec::with_capacity(2 * (n - 1));
    out.push(edges[0]);
    for &e in &edges[1..n - 1] {
        out.push(e);
        out.push(e);
    }
    out.push(edges[n - 1]);
    out
}

/// Duplicate each count once, matching [`double_edges`] so the pair traces a
/// left-aligned step curve.
fn double_counts(counts: &[f64]) -> Vec<f64> {
    counts.iter().flat_map(|&c| [c, c]).collect()
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the angular histogram bundle for one snapshot.
///
/// Converts each moment to spherical angles, partitions the samples into
/// site-type groups (see [`group_samples`]), bins phi unweighted and theta
/// with the Jacobian weight, and max-normalizes every series independently.
/// `entries[0]` is the aggregate over all samples; groups follow in order,
/// colored from the qualitative palette with index 0 reserved for the
/// aggregate.
pub fn build(
    samples: &[RawSample],
    num_groups: usize,
    num_divisions: usize,
) -> Result<HistogramBundle, DataError> {
    // Both axes need at least one bin after the integer halving for theta.
    if num_divisions < 4 {
        return Err(DataError::InvalidDivisions(num_divisions));
    }

    let spherical = to_spherical(samples)?;
    let grouping = group_samples(&spherical, num_groups);

    let phi_edges = linspace(-PI, PI, num_divisions);
    let theta_edges = linspace(0.0, PI, num_divisions / 2);

    let palette = color::qualitative(grouping.members.len() + 1);

    let series = |indices: &mut dyn Iterator<Item = usize>| -> (Vec<f64>, Vec<f64>) {
        let picked: Vec<&SphericalSample> = indices.map(|j| &spherical[j]).collect();
        let phi = histogram(picked.iter().map(|s| (s.phi, 1.0)), &phi_edges);
        let theta = histogram(picked.iter().map(|s| (s.theta, s.weight)), &theta_edges);
        (phi, theta)
    };

    let mut entries = Vec::with_capacity(grouping.members.len() + 1);

    let (mut phi_tot, mut theta_tot) = series(&mut (0..spherical.len()));
    if !max_normalize(&mut phi_tot) || !max_normalize(&mut theta_tot) {
        return Err(DataError::EmptyGroup { group: 0 });
    }
    entries.push(HistogramEntry {
        label: None,
        phi: double_counts(&phi_tot),
        theta: double_counts(&theta_tot),
        color: palette[0],
    });

    for (g, members) in grouping.members.iter().enumerate() {
        let (mut phi, mut theta) = series(&mut members.iter().copied());
        if !max_normalize(&mut phi) || !max_normalize(&mut theta) {
            return Err(DataError::EmptyGroup { group: g });
        }
        entries.push(HistogramEntry {
            label: Some(grouping.labels[g].clone()),
            phi: double_counts(&phi),
            theta: double_counts(&theta),
            color: palette[g + 1],
        });
    }

    Ok(HistogramBundle {
        phi_edges: double_edges(&phi_edges),
        theta_edges: double_edges(&theta_edges),
        entries,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(magnitude: f64, moment: [f64; 3]) -> RawSample {
        RawSample { magnitude, moment }
    }

    /// The worked three-sample snapshot: +x, +y and +z moments with
    /// distinct magnitudes so Mode A sees three site types.
    fn axis_samples() -> Vec<RawSample> {
        vec![
            sample(1.0, [1.0, 0.0, 0.0]),
            sample(2.0, [0.0, 1.0, 0.0]),
            sample(3.0, [0.0, 0.0, 1.0]),
        ]
    }

    #[test]
    fn angles_stay_in_range() {
        let dirs: Vec<RawSample> = (0..64)
            .map(|i| {
                let a = i as f64 * 0.41;
                let b = (i as f64 * 0.13).sin();
                let (x, y) = ((1.0 - b * b).sqrt() * a.cos(), (1.0 - b * b).sqrt() * a.sin());
                sample(1.0, [x, y, b])
            })
            .collect();

        let spherical = to_spherical(&dirs).unwrap();
        for s in spherical {
            assert!(s.phi > -PI && s.phi <= PI, "phi {} out of range", s.phi);
            assert!((0.0..=PI).contains(&s.theta), "theta {} out of range", s.theta);
        }
    }

    #[test]
    fn jacobian_weight_is_monotone_and_bounded_below() {
        let mut prev = 0.0;
        for &z in &[0.0, 0.3, 0.5, 0.9, 0.99, 0.9999] {
            let w = jacobian_weight(z);
            assert!(w >= 1.0);
            assert!(w > prev, "weight not increasing at z={z}");
            // Symmetric in z.
            assert_eq!(w, jacobian_weight(-z));
            prev = w;
        }
        // At the pole, the epsilon floor caps the weight near 1e6.
        assert!((jacobian_weight(1.0) - 1e6).abs() < 1.0);
    }

    #[test]
    fn z_axis_moment_has_defined_phi() {
        let spherical = to_spherical(&[sample(1.0, [0.0, 0.0, 1.0])]).unwrap();
        assert_eq!(spherical[0].phi, 0.0);
        assert_eq!(spherical[0].theta, 0.0);
    }

    #[test]
    fn z_slightly_outside_unit_is_clamped() {
        let spherical = to_spherical(&[sample(1.0, [0.0, 0.0, 1.0 + 1e-9])]).unwrap();
        assert_eq!(spherical[0].theta, 0.0);
        assert!(spherical[0].weight.is_finite());
    }

    #[test]
    fn z_far_outside_unit_is_rejected() {
        let err = to_spherical(&[
            sample(1.0, [1.0, 0.0, 0.0]),
            sample(1.0, [0.0, 0.0, 1.5]),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::NumericDomain { index: 1, value } if value == 1.5));
    }

    #[test]
    fn non_finite_components_are_rejected() {
        // NaN slips through range comparisons, so it needs its own guard:
        // without one it would reach the binning and panic there.
        let err = to_spherical(&[
            sample(1.0, [1.0, 0.0, 0.0]),
            sample(1.0, [f64::NAN, 0.0, 0.5]),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::NumericDomain { index: 1, value } if value.is_nan()));

        let err = to_spherical(&[sample(1.0, [0.0, f64::INFINITY, 0.0])]).unwrap_err();
        assert!(matches!(err, DataError::NumericDomain { index: 0, value } if value.is_infinite()));
    }

    #[test]
    fn nan_value_falls_outside_every_bin() {
        let edges = linspace(-PI, PI, 8);
        assert_eq!(bin_index(&edges, f64::NAN), None);
    }

    #[test]
    fn inferred_grouping_partitions_by_magnitude() {
        let samples = vec![
            sample(1.0, [1.0, 0.0, 0.0]),
            sample(2.0, [0.0, 1.0, 0.0]),
            sample(1.0, [0.0, 0.0, 1.0]),
            sample(2.0, [0.0, 0.0, -1.0]),
        ];
        let spherical = to_spherical(&samples).unwrap();
        let grouping = group_samples(&spherical, 0);

        assert_eq!(grouping.labels, vec!["1", "2"]);
        assert_eq!(grouping.members, vec![vec![0, 2], vec![1, 3]]);

        let total: usize = grouping.members.iter().map(Vec::len).sum();
        assert_eq!(total, samples.len());
    }

    #[test]
    fn striped_grouping_interleaves_samples() {
        let spherical = to_spherical(&[
            sample(1.0, [1.0, 0.0, 0.0]),
            sample(1.0, [0.0, 1.0, 0.0]),
            sample(1.0, [-1.0, 0.0, 0.0]),
            sample(1.0, [0.0, -1.0, 0.0]),
        ])
        .unwrap();
        let grouping = group_samples(&spherical, 2);

        assert_eq!(grouping.labels, vec!["1", "2"]);
        assert_eq!(grouping.members, vec![vec![0, 2], vec![1, 3]]);
    }

    #[test]
    fn sorted_unique_dedups_and_orders() {
        assert_eq!(sorted_unique([2.0, 1.0, 2.0, 0.5]), vec![0.5, 1.0, 2.0]);
        assert!(sorted_unique(std::iter::empty()).is_empty());
    }

    #[test]
    fn upper_edge_is_inclusive() {
        // atan2(0, -1) = π lands in the last phi bin, not out of range.
        let edges = linspace(-PI, PI, 8);
        assert_eq!(bin_index(&edges, PI), Some(6));
        assert_eq!(bin_index(&edges, -PI), Some(0));
        assert_eq!(bin_index(&edges, PI + 0.1), None);
    }

    #[test]
    fn step_doubling_lengths_match() {
        let bundle = build(&axis_samples(), 0, 16).unwrap();

        // 16 phi edges → 15 bins; 8 theta edges → 7 bins.
        assert_eq!(bundle.phi_edges.len(), 2 * 15);
        assert_eq!(bundle.theta_edges.len(), 2 * 7);
        for e in &bundle.entries {
            assert_eq!(e.phi.len(), bundle.phi_edges.len());
            assert_eq!(e.theta.len(), bundle.theta_edges.len());
        }

        // Interior edges appear twice, end edges once.
        assert_eq!(bundle.phi_edges[0], -PI);
        assert_eq!(bundle.phi_edges[1], bundle.phi_edges[2]);
        assert_eq!(*bundle.phi_edges.last().unwrap(), PI);
    }

    #[test]
    fn every_series_is_max_normalized() {
        let bundle = build(&axis_samples(), 0, 32).unwrap();
        for e in &bundle.entries {
            for counts in [&e.phi, &e.theta] {
                let max = counts.iter().cloned().fold(0.0_f64, f64::max);
                assert_eq!(max, 1.0);
                assert!(counts.iter().all(|&c| (0.0..=1.0).contains(&c)));
            }
        }
    }

    #[test]
    fn three_axis_moments_end_to_end() {
        let bundle = build(&axis_samples(), 0, 16).unwrap();

        // Aggregate plus one inferred group per distinct magnitude.
        assert_eq!(bundle.entries.len(), 4);
        assert_eq!(bundle.entries[0].label, None);
        assert_eq!(bundle.entries[1].label.as_deref(), Some("1"));
        assert_eq!(bundle.entries[3].label.as_deref(), Some("3"));

        // phi: +x and +z moments both land at phi = 0 (bin 7 of 15), the +y
        // moment at π/2 (bin 11); max-normalization makes those 1.0 and 0.5.
        let total = &bundle.entries[0];
        assert_eq!(total.phi[2 * 7], 1.0);
        assert_eq!(total.phi[2 * 7 + 1], 1.0);
        assert_eq!(total.phi[2 * 11], 0.5);
        assert_eq!(total.phi.iter().sum::<f64>(), 2.0 * 1.5);

        // theta: the +z moment sits at θ = 0 with the capped pole weight, so
        // the equatorial bin (two unit-weight samples) normalizes to 2e-6.
        assert_eq!(total.theta[0], 1.0);
        let equator = total.theta[2 * 3];
        assert!((equator - 2e-6).abs() < 1e-18);
    }

    #[test]
    fn aggregate_and_groups_use_distinct_palette_slots() {
        let bundle = build(&axis_samples(), 0, 16).unwrap();
        let colors: Vec<[u8; 3]> = bundle.entries.iter().map(|e| e.color).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn more_groups_than_samples_is_an_empty_group() {
        let err = build(&axis_samples(), 5, 16).unwrap_err();
        assert!(matches!(err, DataError::EmptyGroup { group: 3 }));
    }

    #[test]
    fn too_few_divisions_is_rejected() {
        let err = build(&axis_samples(), 0, 3).unwrap_err();
        assert!(matches!(err, DataError::InvalidDivisions(3)));
    }

    #[test]
    fn rebuild_is_bit_identical() {
        let samples: Vec<RawSample> = (0..50)
            .map(|i| {
                let a = i as f64 * 0.7;
                let z = (i as f64 * 0.29).cos();
                let r = (1.0 - z * z).sqrt();
                sample(1.0 + (i % 3) as f64, [r * a.cos(), r * a.sin(), z])
            })
            .collect();

        let first = build(&samples, 0, 180).unwrap();
        let second = build(&samples, 0, 180).unwrap();
        assert_eq!(first, second);
    }
}

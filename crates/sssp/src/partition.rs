use rayon::prelude::*;

use crate::Error;

/// Lower bound on the bucket width, guarding against degenerate minimum
/// weights.
const MIN_BUCKET_WIDTH: f64 = 1e-8;

/// Smallest bucket count handed out for non-trivial weight distributions.
const MIN_NUM_BUCKETS: usize = 1024;

/// Bucket counts are capped here before word alignment.
const MAX_NUM_BUCKETS: usize = 100_000;

/// Derived parameters of the cyclic bucket frontier.
///
/// `bucket_width` never exceeds the minimum edge weight. This guarantees
/// that relaxing a node popped from the current bucket can only produce
/// tentative distances in strictly later buckets, so processing buckets in
/// cursor order yields nodes in non-decreasing distance order.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BucketParams {
    pub bucket_width: f64,
    pub num_buckets: usize,
}

/// Derives bucket parameters from the edge-weight distribution.
///
/// The bucket count is the smallest power of two that covers the weight
/// range at the chosen width, at least 1024, capped at 100,000 and
/// rounded up to a multiple of 64 so that the occupancy bitmap consists
/// of whole words.
pub fn bucket_params(weights: &[f64]) -> Result<BucketParams, Error> {
    if weights.is_empty() {
        // No edges to relax, the search settles the source and stops.
        return Ok(BucketParams {
            bucket_width: 1.0,
            num_buckets: 64,
        });
    }

    let (min_weight, max_weight) = weights
        .par_iter()
        .fold(
            || (f64::INFINITY, 0.0_f64),
            |(lo, hi), &w| (lo.min(w), hi.max(w)),
        )
        .reduce(
            || (f64::INFINITY, 0.0_f64),
            |(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)),
        );

    if !(min_weight.is_finite() && min_weight > 0.0) {
        return Err(Error::InvalidWeight { weight: min_weight });
    }

    let bucket_width = min_weight.max(MIN_BUCKET_WIDTH);
    let min_buckets = (max_weight / bucket_width).ceil() as usize + 2;

    let mut num_buckets = MIN_NUM_BUCKETS;
    while num_buckets < min_buckets && num_buckets < MAX_NUM_BUCKETS {
        num_buckets *= 2;
    }
    let num_buckets = (num_buckets.min(MAX_NUM_BUCKETS) + 63) & !63;

    Ok(BucketParams {
        bucket_width,
        num_buckets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_minimum_weight() {
        let params = bucket_params(&[0.5, 2.0, 1.5]).unwrap();

        assert_eq!(params.bucket_width, 0.5);
        assert_eq!(params.num_buckets, MIN_NUM_BUCKETS);
    }

    #[test]
    fn width_is_clamped_for_tiny_weights() {
        let params = bucket_params(&[1e-12, 1.0]).unwrap();

        assert_eq!(params.bucket_width, MIN_BUCKET_WIDTH);
    }

    #[test]
    fn bucket_count_covers_weight_range() {
        // range / width = 1e4, needs more than the minimum bucket count
        let params = bucket_params(&[1.0, 10_000.0]).unwrap();

        assert!(params.num_buckets >= 10_002);
        assert!(params.num_buckets.is_power_of_two());
    }

    #[test]
    fn bucket_count_is_capped_and_word_aligned() {
        let params = bucket_params(&[1e-8, 1.0]).unwrap();

        assert!(params.num_buckets <= (MAX_NUM_BUCKETS + 63) & !63);
        assert_eq!(params.num_buckets % 64, 0);
    }

    #[test]
    fn empty_weights_yield_trivial_partition() {
        let params = bucket_params(&[]).unwrap();

        assert!(params.bucket_width > 0.0);
        assert_eq!(params.num_buckets, 64);
    }

    #[test]
    fn non_positive_minimum_is_rejected() {
        assert!(matches!(
            bucket_params(&[0.0, 1.0]),
            Err(Error::InvalidWeight { .. })
        ));
        assert!(matches!(
            bucket_params(&[-1.0, 1.0]),
            Err(Error::InvalidWeight { .. })
        ));
    }
}

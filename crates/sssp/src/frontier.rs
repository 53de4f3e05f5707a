use csr_graph::Idx;

use crate::partition::BucketParams;
use crate::Error;

const WORD_BITS: usize = 64;

/// A cyclic bucket queue over tentative distances.
///
/// Distances are quantized into buckets of `bucket_width`; an entry with
/// distance `d` lives in bucket `floor(d / bucket_width) % num_buckets`.
/// A bitmap with one bit per bucket tracks occupancy and a monotone cursor
/// walks the ring, so the minimum entry is found without a heap.
///
/// There is no decrease-key: a node whose tentative distance improves is
/// inserted again and the outdated entry is skipped by the caller when it
/// surfaces. The cursor only ever moves forward; because `bucket_width`
/// does not exceed the minimum edge weight, no relaxation can produce an
/// entry behind it.
pub struct FrontierBucket<NI> {
    buckets: Vec<Vec<NI>>,
    bitmap: Vec<u64>,
    bucket_width: f64,
    num_buckets: usize,
    cursor: usize,
    size: usize,
}

impl<NI: Idx> FrontierBucket<NI> {
    pub fn new(params: BucketParams) -> Self {
        // whole bitmap words only
        let num_buckets = (params.num_buckets + 63) & !63;

        Self {
            buckets: (0..num_buckets).map(|_| Vec::new()).collect(),
            bitmap: vec![0_u64; num_buckets / WORD_BITS],
            bucket_width: params.bucket_width,
            num_buckets,
            cursor: 0,
            size: 0,
        }
    }

    /// Appends a node to the bucket encoding the given distance.
    ///
    /// Fails with [`Error::BucketOverflow`] if the distance lies a full
    /// ring ahead of the cursor. That can only happen when the bucket
    /// count was sized too small for the observed distance range.
    pub fn insert(&mut self, node: NI, distance: f64) -> Result<(), Error> {
        let slot = (distance / self.bucket_width) as usize;
        if slot >= self.cursor + self.num_buckets {
            return Err(Error::BucketOverflow {
                distance,
                cursor: self.cursor,
                num_buckets: self.num_buckets,
            });
        }

        let bucket = slot % self.num_buckets;
        self.buckets[bucket].push(node);
        self.bitmap[bucket / WORD_BITS] |= 1 << (bucket % WORD_BITS);
        self.size += 1;

        Ok(())
    }

    /// Removes and returns a node from the non-empty bucket closest to the
    /// cursor, or `None` if the frontier is drained.
    ///
    /// Empty buckets are skipped one at a time; a fully zero bitmap word
    /// lets the cursor jump to the next word boundary instead.
    pub fn pop_min(&mut self) -> Option<NI> {
        if self.size == 0 {
            return None;
        }

        loop {
            let bucket = self.cursor % self.num_buckets;
            if !self.buckets[bucket].is_empty() {
                break;
            }
            if self.bitmap[bucket / WORD_BITS] == 0 {
                self.cursor = (self.cursor / WORD_BITS + 1) * WORD_BITS;
            } else {
                self.cursor += 1;
            }
        }

        let bucket = self.cursor % self.num_buckets;
        let node = self.buckets[bucket].pop();
        self.size -= 1;
        if self.buckets[bucket].is_empty() {
            self.bitmap[bucket / WORD_BITS] &= !(1 << (bucket % WORD_BITS));
        }

        node
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn len(&self) -> usize {
        self.size
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        let counted = self.buckets.iter().map(Vec::len).sum::<usize>();
        assert_eq!(self.size, counted, "size must equal the sum of bucket counts");

        for (bucket, entries) in self.buckets.iter().enumerate() {
            let bit = self.bitmap[bucket / WORD_BITS] >> (bucket % WORD_BITS) & 1;
            assert_eq!(
                bit == 1,
                !entries.is_empty(),
                "bitmap bit {bucket} must mirror bucket occupancy"
            );
        }
    }
}

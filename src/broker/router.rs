//! Topic → shard routing
//!
//! Every operation on a topic must reach the same shard worker, so the
//! mapping is a pure function of the topic name: CRC-32 of its bytes reduced
//! modulo the shard count.

/// Index of the shard that owns `topic`, in `[0, shard_count)`.
///
/// `shard_count` must be non-zero.
pub fn shard_index(topic: &str, shard_count: usize) -> usize {
    debug_assert!(shard_count > 0, "shard_count must be non-zero");
    crc32fast::hash(topic.as_bytes()) as usize % shard_count
}

/// Number of shards used when none is configured: one less than the number
/// of logical CPUs, never below one.
pub fn default_shard_count() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_stable_and_in_range() {
        for shards in 1..=16 {
            for topic in ["jobs", "orders", "", "ünïcödé", "a/b/c"] {
                let first = shard_index(topic, shards);
                assert!(first < shards);
                for _ in 0..10 {
                    assert_eq!(shard_index(topic, shards), first);
                }
            }
        }
    }

    #[test]
    fn single_shard_owns_everything() {
        assert_eq!(shard_index("anything", 1), 0);
        assert_eq!(shard_index("else", 1), 0);
    }

    #[test]
    fn topics_spread_across_shards() {
        let shards = 4;
        let mut hits = vec![0usize; shards];
        for i in 0..1000 {
            hits[shard_index(&format!("topic-{i}"), shards)] += 1;
        }
        // every shard should get a reasonable share
        assert!(hits.iter().all(|&h| h > 150), "skewed distribution: {hits:?}");
    }

    #[test]
    fn default_shard_count_is_at_least_one() {
        assert!(default_shard_count() >= 1);
    }
}

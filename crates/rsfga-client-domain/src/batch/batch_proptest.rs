//! Property-based tests for the batcher.

use proptest::prelude::*;

use super::*;

fn tuples(prefix: &'static str, max: usize) -> impl Strategy<Value = Vec<Tuple>> {
    prop::collection::vec(("[a-z]{1,8}", "[a-z]{1,6}", "[a-z0-9]{1,8}"), 0..max).prop_map(
        move |fields| {
            fields
                .into_iter()
                .enumerate()
                .map(|(i, (user, relation, id))| {
                    Tuple::new(
                        format!("user:{prefix}{i}{user}"),
                        relation,
                        format!("document:{id}"),
                    )
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn test_chunk_count_is_ceiling_of_total_over_limit(
        writes in tuples("w", 60),
        deletes in tuples("d", 60),
        limit in 1usize..40,
    ) {
        let change_set = TupleChangeSet::new(writes, deletes).unwrap();
        let chunks = Batcher::try_new(limit).unwrap().split(&change_set);
        let total = change_set.len();

        prop_assert_eq!(chunks.len(), total.div_ceil(limit));
        prop_assert_eq!(chunks.is_empty(), total == 0);
    }

    #[test]
    fn test_chunks_respect_limit_and_are_never_empty(
        writes in tuples("w", 60),
        deletes in tuples("d", 60),
        limit in 1usize..40,
    ) {
        let change_set = TupleChangeSet::new(writes, deletes).unwrap();
        let chunks = Batcher::try_new(limit).unwrap().split(&change_set);
        for (position, chunk) in chunks.iter().enumerate() {
            prop_assert!(chunk.len() <= limit);
            prop_assert!(!chunk.is_empty());
            prop_assert_eq!(chunk.index(), position);
        }
    }

    #[test]
    fn test_concatenated_chunks_reproduce_both_sequences(
        writes in tuples("w", 60),
        deletes in tuples("d", 60),
        limit in 1usize..40,
    ) {
        let change_set = TupleChangeSet::new(writes, deletes).unwrap();
        let chunks = Batcher::try_new(limit).unwrap().split(&change_set);

        let rejoined_writes: Vec<Tuple> =
            chunks.iter().flat_map(|c| c.writes().iter().cloned()).collect();
        let rejoined_deletes: Vec<Tuple> =
            chunks.iter().flat_map(|c| c.deletes().iter().cloned()).collect();

        prop_assert_eq!(rejoined_writes.as_slice(), change_set.writes());
        prop_assert_eq!(rejoined_deletes.as_slice(), change_set.deletes());
    }
}

// src/crawl/batch.rs
// =============================================================================
// Splits a flat list into fixed-size batches.
//
// The site crawler never uses this: it visits one page at a time. The
// `links` subcommand does, to check a long list of URLs a few at a time.
//
// Rust concepts:
// - NonZeroUsize: a batch size of 0 can't even be expressed
// - slice::chunks: the standard library already knows how to cut a slice
// =============================================================================

use std::num::NonZeroUsize;

// Splits `items` into batches of `batch_size`, keeping the order
//
// The last batch is shorter when the length isn't a multiple of the size.
// An empty input gives no batches at all.
pub fn split_into_batches<T: Clone>(items: &[T], batch_size: NonZeroUsize) -> Vec<Vec<T>> {
    items
        .chunks(batch_size.get())
        .map(|chunk| chunk.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_last_batch_is_shorter() {
        let urls = ["a", "b", "c", "d", "e"];
        let batches = split_into_batches(&urls, size(2));
        assert_eq!(batches, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);
    }

    #[test]
    fn test_exact_multiple() {
        let batches = split_into_batches(&[1, 2, 3, 4], size(2));
        assert_eq!(batches, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_batch_larger_than_input() {
        let batches = split_into_batches(&["only"], size(10));
        assert_eq!(batches, vec![vec!["only"]]);
    }

    #[test]
    fn test_empty_input() {
        let batches = split_into_batches::<String>(&[], size(3));
        assert!(batches.is_empty());
    }
}

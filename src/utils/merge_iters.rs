use std::{cmp::Ordering, iter::Peekable};

/// Iterator adapter interleaving two iterators which are each sorted in
/// ascending order by `get_key` into a single ascending stream. On equal keys
/// the item of the `left` iterator comes first.
pub struct MergeAscending<L, R, F, O>
where
    L: Iterator<Item = R::Item>,
    R: Iterator,
    F: Fn(&R::Item) -> O,
    O: PartialOrd,
{
    left: Peekable<L>,
    right: Peekable<R>,
    get_key: F,
}

impl<L, R, F, O> Iterator for MergeAscending<L, R, F, O>
where
    L: Iterator<Item = R::Item>,
    R: Iterator,
    F: Fn(&R::Item) -> O,
    O: PartialOrd,
{
    type Item = L::Item;

    fn next(&mut self) -> Option<L::Item> {
        let take_left = match (self.left.peek(), self.right.peek()) {
            (Some(left), Some(right)) => !matches!(
                (self.get_key)(left).partial_cmp(&(self.get_key)(right)),
                Some(Ordering::Greater)
            ),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => return None,
        };

        if take_left {
            self.left.next()
        } else {
            self.right.next()
        }
    }
}

pub trait MergeSorted: Iterator {
    fn merge_sorted_by_key<R, F, O>(self, other: R, get_key: F) -> MergeAscending<Self, R, F, O>
    where
        Self: Sized,
        R: Iterator<Item = Self::Item>,
        F: Fn(&Self::Item) -> O,
        O: PartialOrd,
    {
        MergeAscending {
            left: self.peekable(),
            right: other.peekable(),
            get_key,
        }
    }
}

impl<T> MergeSorted for T where T: Iterator + ?Sized {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_merge_sorted_by_key() {
        let left = [(0, 0), (1, 3), (5, 5)];
        let right = [(0, 0), (0, 2), (4, 6)];

        let result: Vec<(usize, usize)> = left
            .into_iter()
            .merge_sorted_by_key(right.into_iter(), |range| *range)
            .collect();

        assert_eq!(result, vec![(0, 0), (0, 0), (0, 2), (1, 3), (4, 6), (5, 5)]);
    }

    #[test]
    fn test_left_wins_ties() {
        let left = [(1, 'l')];
        let right = [(1, 'r')];

        let result: Vec<(i32, char)> = left
            .into_iter()
            .merge_sorted_by_key(right.into_iter(), |(key, _)| *key)
            .collect();

        assert_eq!(result, vec![(1, 'l'), (1, 'r')]);
    }

    #[test]
    fn test_one_side_empty() {
        let result: Vec<i32> = std::iter::empty()
            .merge_sorted_by_key([1, 2, 3].into_iter(), |x| *x)
            .collect();

        assert_eq!(result, vec![1, 2, 3]);
    }
}

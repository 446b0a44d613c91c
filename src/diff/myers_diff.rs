//! Based on <https://github.com/mitsuhiko/similar/blob/7e15c44de11a1cd61e1149189929e189ef977fd8/src/algorithms/myers.rs>
//!
//! Myers' diff algorithm.
//!
//! * time: `O((N+M)D)`
//! * space `O(N+M)`
//!
//! See [the original article by Eugene W. Myers](http://www.xmailserver.org/diff2.pdf)
//! describing it.
//!
//! The implementation of this algorithm is based on the implementation by
//! Brandon Williams.
//!
//! # Heuristics
//!
//! At present this implementation of Myers' does not implement any more
//! advanced heuristics that would solve some pathological cases.  For instance
//! passing two large and completely distinct sequences to the algorithm will
//! make it spin without making reasonable progress.

use std::ops::{Index, IndexMut, Range};

use super::raw_operation::RawOperation;
use crate::{
    Equality,
    utils::{common_prefix_len::common_prefix_len, common_suffix_len::common_suffix_len},
};

/// Myers' diff algorithm.
///
/// Common prefixes are consumed before anything else at every level of the
/// recursion, so matching elements are aligned as early as possible.
pub fn myers_diff<E>(old: &[E], new: &[E], equality: &Equality<E>) -> Vec<RawOperation> {
    let max_d = (old.len() + new.len()).div_ceil(2) + 1;
    let mut vb = V::new(max_d);
    let mut vf = V::new(max_d);
    let mut result = Vec::new();

    let mut context = Context {
        old,
        new,
        equality,
        vf: &mut vf,
        vb: &mut vb,
    };
    context.conquer(0..old.len(), 0..new.len(), &mut result);

    result
}

// A D-path is a path which starts at (0,0) that has exactly D non-diagonal
// edges. All D-paths consist of a (D - 1)-path followed by a non-diagonal edge
// and then a possibly empty sequence of diagonal edges called a snake.

/// `V` contains the endpoints of the furthest reaching `D-paths`. For each
/// recorded endpoint `(x,y)` in diagonal `k`, we only need to retain `x`
/// because `y` can be computed from `x - k`. In other words, `V` is an array of
/// integers where `V[k]` contains the row index of the endpoint of the furthest
/// reaching path in diagonal `k`.
///
/// We can't use a traditional Vec to represent `V` since we use `k` as an index
/// and it can take on negative values. So instead `V` is represented as a
/// light-weight wrapper around a Vec plus an `offset` which is the maximum
/// value `k` can take on in order to map negative `k`'s back to a value >= 0.
#[derive(Debug)]
struct V {
    offset: isize,
    v: Vec<usize>,
}

impl V {
    fn new(max_d: usize) -> Self {
        let offset = isize::try_from(max_d).unwrap_or(isize::MAX);
        Self {
            offset,
            v: vec![0; 2 * max_d],
        }
    }

    fn len(&self) -> usize { self.v.len() }

    fn position(&self, index: isize) -> usize {
        let position = usize::try_from(index + self.offset).unwrap_or(usize::MAX);
        position.min(self.v.len().saturating_sub(1))
    }
}

impl Index<isize> for V {
    type Output = usize;

    fn index(&self, index: isize) -> &Self::Output { &self.v[self.position(index)] }
}

impl IndexMut<isize> for V {
    fn index_mut(&mut self, index: isize) -> &mut Self::Output {
        let position = self.position(index);
        &mut self.v[position]
    }
}

fn split_at(range: Range<usize>, at: usize) -> (Range<usize>, Range<usize>) {
    (range.start..at, at..range.end)
}

fn to_isize(value: usize) -> isize { isize::try_from(value).unwrap_or(isize::MAX) }

struct Context<'a, 'v, E> {
    old: &'a [E],
    new: &'a [E],
    equality: &'a Equality<E>,
    vf: &'v mut V,
    vb: &'v mut V,
}

impl<E> Context<'_, '_, E> {
    /// A `Snake` is a sequence of diagonal edges in the edit graph.  Normally
    /// a snake has a start end end point (and it is possible for a snake to
    /// have a length of zero, meaning the start and end points are the same)
    /// however we do not need the end point which is why it's not implemented
    /// here.
    ///
    /// The divide part of a divide-and-conquer strategy. A D-path has D+1
    /// snakes some of which may be empty. The divide step requires finding the
    /// ceil(D/2) + 1 or middle snake of an optimal D-path. The idea for doing
    /// so is to simultaneously run the basic algorithm in both the forward and
    /// reverse directions until furthest reaching forward and reverse paths
    /// starting at opposing corners 'overlap'.
    fn find_middle_snake(
        &mut self,
        old_range: Range<usize>,
        new_range: Range<usize>,
    ) -> Option<(usize, usize)> {
        let n = old_range.len();
        let m = new_range.len();

        // By Lemma 1 in the paper, the optimal edit script length is odd or even
        // as `delta` is odd or even.
        let delta = to_isize(n) - to_isize(m);
        let odd = delta & 1 == 1;

        // The initial point at (0, -1)
        self.vf[1] = 0;
        // The initial point at (N, M+1)
        self.vb[1] = 0;

        let d_max = (n + m).div_ceil(2) + 1;
        debug_assert!(self.vf.len() >= d_max);
        debug_assert!(self.vb.len() >= d_max);

        for d in 0..to_isize(d_max) {
            // Forward path
            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && self.vf[k - 1] < self.vf[k + 1]) {
                    self.vf[k + 1]
                } else {
                    self.vf[k - 1] + 1
                };
                let y = usize::try_from(to_isize(x) - k).unwrap_or(0);

                // The coordinate of the start of a snake
                let (x0, y0) = (x, y);
                // While these sequences are identical, keep moving through the
                // graph with no cost
                if x < n && y < m {
                    x += common_prefix_len(
                        self.old,
                        old_range.start + x..old_range.end,
                        self.new,
                        new_range.start + y..new_range.end,
                        self.equality,
                    );
                }

                // This is the new best x value
                self.vf[k] = x;

                // Only check for connections from the forward search when N - M
                // is odd and when there is a reciprocal k line coming from the
                // other direction.
                if odd && (k - delta).abs() <= (d - 1) && self.vf[k] + self.vb[-(k - delta)] >= n
                {
                    return Some((x0 + old_range.start, y0 + new_range.start));
                }
            }

            // Backward path
            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && self.vb[k - 1] < self.vb[k + 1]) {
                    self.vb[k + 1]
                } else {
                    self.vb[k - 1] + 1
                };
                let mut y = usize::try_from(to_isize(x) - k).unwrap_or(0);

                // The coordinate of the start of a snake
                if x < n && y < m {
                    let advance = common_suffix_len(
                        self.old,
                        old_range.start..old_range.start + n - x,
                        self.new,
                        new_range.start..new_range.start + m - y,
                        self.equality,
                    );
                    x += advance;
                    y += advance;
                }

                // This is the new best x value
                self.vb[k] = x;

                if !odd && (k - delta).abs() <= d && self.vb[k] + self.vf[-(k - delta)] >= n {
                    return Some((n - x + old_range.start, m - y + new_range.start));
                }
            }
        }

        None
    }

    fn conquer(
        &mut self,
        mut old_range: Range<usize>,
        mut new_range: Range<usize>,
        result: &mut Vec<RawOperation>,
    ) {
        let common_prefix_len = common_prefix_len(
            self.old,
            old_range.clone(),
            self.new,
            new_range.clone(),
            self.equality,
        );
        if common_prefix_len > 0 {
            result.push(RawOperation::Equal {
                old: old_range.start..old_range.start + common_prefix_len,
                new: new_range.start..new_range.start + common_prefix_len,
            });
        }
        old_range.start += common_prefix_len;
        new_range.start += common_prefix_len;

        let common_suffix_len = common_suffix_len(
            self.old,
            old_range.clone(),
            self.new,
            new_range.clone(),
            self.equality,
        );
        old_range.end -= common_suffix_len;
        new_range.end -= common_suffix_len;
        let common_suffix = (old_range.end, new_range.end);

        if old_range.is_empty() && new_range.is_empty() {
            // nothing left between the prefix and the suffix
        } else if new_range.is_empty() {
            result.push(RawOperation::Delete {
                new_index: new_range.start,
                old: old_range,
            });
        } else if old_range.is_empty() {
            result.push(RawOperation::Insert {
                old_index: old_range.start,
                new: new_range,
            });
        } else if let Some((x_start, y_start)) =
            self.find_middle_snake(old_range.clone(), new_range.clone())
        {
            let (old_a, old_b) = split_at(old_range, x_start);
            let (new_a, new_b) = split_at(new_range, y_start);
            self.conquer(old_a, new_a, result);
            self.conquer(old_b, new_b, result);
        } else {
            result.push(RawOperation::Delete {
                old: old_range.clone(),
                new_index: new_range.start,
            });
            result.push(RawOperation::Insert {
                old_index: old_range.end,
                new: new_range,
            });
        }

        if common_suffix_len > 0 {
            result.push(RawOperation::Equal {
                old: common_suffix.0..common_suffix.0 + common_suffix_len,
                new: common_suffix.1..common_suffix.1 + common_suffix_len,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn diff(old: &str, new: &str) -> Vec<RawOperation> {
        myers_diff(old.as_bytes(), new.as_bytes(), &u8::eq)
    }

    #[test]
    fn test_empty_diff() {
        assert_eq!(diff("", ""), vec![]);
    }

    #[test]
    fn test_identical_content() {
        assert_eq!(diff("abc", "abc"), vec![RawOperation::Equal {
            old: 0..3,
            new: 0..3
        }]);
    }

    #[test]
    fn test_insert_only() {
        assert_eq!(diff("", "ab"), vec![RawOperation::Insert {
            old_index: 0,
            new: 0..2
        }]);
    }

    #[test]
    fn test_delete_only() {
        assert_eq!(diff("ab", ""), vec![RawOperation::Delete {
            old: 0..2,
            new_index: 0
        }]);
    }

    #[test]
    fn test_prefix_and_suffix() {
        let operations = diff("abcd", "axd");

        assert_eq!(operations.first(), Some(&RawOperation::Equal { old: 0..1, new: 0..1 }));
        assert_eq!(operations.last(), Some(&RawOperation::Equal { old: 3..4, new: 2..3 }));
        assert!(
            operations[1..operations.len() - 1]
                .iter()
                .all(|op| !matches!(op, RawOperation::Equal { .. }))
        );
    }

    #[test]
    fn test_operations_cover_both_sequences() {
        let cases = [
            ("abcabba", "cbabac"),
            ("kitten", "sitting"),
            ("abcdefgh", "hgfedcba"),
            ("", "xyz"),
            ("same", "same"),
        ];

        for (old, new) in cases {
            let operations = diff(old, new);

            let mut old_position = 0;
            let mut new_position = 0;
            for operation in &operations {
                assert!(!operation.is_empty(), "{operation:?} is a no-op");
                assert_eq!(operation.old_range().start, old_position);
                assert_eq!(operation.new_range().start, new_position);
                if let RawOperation::Equal { old: old_range, new: new_range } = operation {
                    assert_eq!(
                        old.as_bytes()[old_range.clone()],
                        new.as_bytes()[new_range.clone()]
                    );
                }
                old_position = operation.old_range().end;
                new_position = operation.new_range().end;
            }

            assert_eq!((old_position, new_position), (old.len(), new.len()));
        }
    }

    #[test]
    fn test_finds_longest_common_subsequence() {
        // LCS of "abcabba" and "cbabac" has length 4 (e.g. "baba" or "caba")
        let matched: usize = diff("abcabba", "cbabac")
            .iter()
            .filter_map(|operation| match operation {
                RawOperation::Equal { old, .. } => Some(old.len()),
                _ => None,
            })
            .sum();

        assert_eq!(matched, 4);
    }
}

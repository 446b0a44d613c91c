pub mod common_prefix_len;
pub mod common_suffix_len;
pub mod merge_iters;
pub mod sequences_equal;

//! Filesystem primitives shared across features.

pub mod copy;
pub mod tree_hash;

pub use copy::{copy_file_with_metadata, copy_tree, ensure_dir, remove_path, replace_dir};
pub use tree_hash::{hash_file, hash_tree};

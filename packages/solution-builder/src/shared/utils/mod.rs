//! Shared utilities

pub mod paths;

pub use paths::{
    extension_of, file_name_of, file_stem_of, normalize, path_key, relative_path, to_native,
};

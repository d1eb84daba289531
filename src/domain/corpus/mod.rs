//! Pre-built corpus of embedded document fragments

mod fragment;

pub use fragment::EmbeddedFragment;

//! Helpers that read common structures out of decoded objects.

pub mod container;
pub mod labels;
pub mod selector;

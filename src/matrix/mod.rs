//! File to matrix conversion.

pub(crate) mod builder;
pub(crate) mod decode;
pub(crate) mod model;

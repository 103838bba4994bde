//! Duration reconciliation and per-frame windowing.

pub(crate) mod duration;
pub(crate) mod window;

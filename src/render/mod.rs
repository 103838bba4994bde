pub(crate) mod backend;
pub(crate) mod colormap;
pub(crate) mod cpu;
pub(crate) mod projection;

pub(crate) mod ease;
pub(crate) mod interpolate;
pub(crate) mod phase;
pub(crate) mod props;
pub(crate) mod timeline;

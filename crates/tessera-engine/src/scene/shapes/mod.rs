pub(crate) mod line;
pub(crate) mod overlay;
pub(crate) mod rect;
pub(crate) mod sprite;

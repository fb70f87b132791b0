pub(crate) mod color;
pub(crate) mod decode;
pub(crate) mod sprite_cache;
pub(crate) mod text;

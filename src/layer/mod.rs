pub(crate) mod composite;
pub(crate) mod manager;
pub(crate) mod model;
pub(crate) mod surface;

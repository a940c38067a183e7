pub(crate) mod dsl;
pub(crate) mod edit;
pub(crate) mod model;

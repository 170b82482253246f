pub(crate) mod canonical;
pub(crate) mod climatology;
pub(crate) mod geo;
pub(crate) mod provider;

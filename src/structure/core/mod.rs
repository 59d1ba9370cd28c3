pub(crate) mod lattice;
pub(crate) mod trajectory;

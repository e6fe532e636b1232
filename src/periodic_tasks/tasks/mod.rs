pub(crate) mod fulfill_randomness;

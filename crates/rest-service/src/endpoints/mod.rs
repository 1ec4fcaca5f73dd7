pub(crate) mod current_block;
pub(crate) mod health;
pub(crate) mod subscribe;
pub(crate) mod transactions;

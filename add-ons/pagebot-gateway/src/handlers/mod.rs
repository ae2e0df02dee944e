pub(crate) mod respond;
pub(crate) mod topics;

pub(crate) mod list;
pub(crate) mod serve;
pub(crate) mod sync;

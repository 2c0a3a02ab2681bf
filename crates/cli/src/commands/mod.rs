pub(crate) mod eval;
pub(crate) mod explain;
pub(crate) mod pump;
pub(crate) mod rate;

pub(crate) mod cancel;
pub(crate) mod gate;
pub(crate) mod parallel;
pub(crate) mod scaler;

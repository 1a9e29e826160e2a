// Logging backend, selected by feature. Without `defmt` or `log` the macros expand to nothing.
//
// The no-op macros carry a trailing underscore: a bare `warn` re-export is ambiguous with the
// built-in `#[warn]` attribute.

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        pub(crate) use defmt::{debug, trace, warn};
    } else if #[cfg(feature = "log")] {
        pub(crate) use ::log::{debug, trace, warn};
    } else {
        macro_rules! trace_ {
            ($($arg:tt)*) => {};
        }
        macro_rules! debug_ {
            ($($arg:tt)*) => {};
        }
        macro_rules! warn_ {
            ($($arg:tt)*) => {};
        }
        pub(crate) use debug_ as debug;
        pub(crate) use trace_ as trace;
        pub(crate) use warn_ as warn;
    }
}

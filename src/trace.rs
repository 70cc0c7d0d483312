//! Logging hooks for the codec and the scanner.
//!
//! Everything is emitted under the `histmatch` target. Without the `tracing`
//! feature the macros expand to nothing observable.

/// Opens an info-level span; call `.entered()` on the result.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:literal $(, $($field:tt)*)?) => {
        tracing::info_span!(target: "histmatch", $name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:literal $(, $($field:tt)*)?) => {
        $crate::trace::DisabledSpan
    };
}

/// Emits an event with `key = value` fields. A leading `debug,` lowers the
/// level for events raised inside scan loops.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    (debug, $name:literal, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::debug!(target: "histmatch", $($key = $value,)+ $name)
    };
    ($name:literal, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(target: "histmatch", $($key = $value,)+ $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    (debug, $name:literal, $($key:ident = $value:expr),+ $(,)?) => {{
        let _ = ($(&$value,)+);
    }};
    ($name:literal, $($key:ident = $value:expr),+ $(,)?) => {{
        let _ = ($(&$value,)+);
    }};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Span guard returned by `trace_span!` when logging is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct DisabledSpan;

#[cfg(not(feature = "tracing"))]
impl DisabledSpan {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

/// Logs a failed fallible call as a warning and carries on. Used for
/// protocol requests whose failure must never interrupt event handling.
#[macro_export]
macro_rules! attempt(
    ($result:expr, $($arg:tt)+) => {
        if let Err(err) = $result {
            warn!("unable to {}: {}", format_args!($($arg)+), err);
        }
    };
);

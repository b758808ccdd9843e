// Logging macros
//
// Structured fields before the `;` are recorded with their `Display` value;
// the message after it is formatted and redacted.

#[macro_export]
macro_rules! redacted_info {
    ($($field:ident = $value:expr),+ ; $($arg:tt)+) => {
        $crate::__private::tracing::info!(
            $($field = %$value),+,
            "{}",
            $crate::redact(&format!($($arg)+))
        )
    };
    ($($arg:tt)+) => {
        $crate::__private::tracing::info!("{}", $crate::redact(&format!($($arg)+)))
    };
}

#[macro_export]
macro_rules! redacted_warn {
    ($($field:ident = $value:expr),+ ; $($arg:tt)+) => {
        $crate::__private::tracing::warn!(
            $($field = %$value),+,
            "{}",
            $crate::redact(&format!($($arg)+))
        )
    };
    ($($arg:tt)+) => {
        $crate::__private::tracing::warn!("{}", $crate::redact(&format!($($arg)+)))
    };
}

//! Optional diagnostics output
//!
//! With `esp32-log` enabled messages go to `esp-println`. Without it the
//! arguments are still type-checked but nothing is printed. Never call this
//! from inside the bit loop.

#[cfg(feature = "esp32-log")]
macro_rules! trace {
    ($($arg:tt)*) => {
        esp_println::println!($($arg)*)
    };
}

#[cfg(not(feature = "esp32-log"))]
macro_rules! trace {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

pub(crate) use trace;

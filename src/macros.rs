// src/macros.rs

/// `String` from anything `String: From<_>`; no argument gives an empty one.
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    ($e:expr) => {
        ::std::string::String::from($e)
    };
}

/// Concatenate string slices into one `String`, sized up front.
#[macro_export]
macro_rules! join {
    ($($part:expr),+ $(,)?) => {{
        let parts: &[&str] = &[$(::core::convert::AsRef::<str>::as_ref($part)),+];
        parts.concat()
    }};
}

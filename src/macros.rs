/// Creates a [`Chain`](crate::Chain) from a format string.
///
/// The arguments are interpreted like those of [`format!()`]. A leading
/// `code = ...` argument sets the code of the node; without it the code is
/// [`Code::UNKNOWN`](crate::Code::UNKNOWN). Unlike [`Chain::new`], the macro
/// also records the name of the enclosing function.
///
/// Messages without arguments are stored without allocating.
///
/// [`format!()`]: std::format
/// [`Chain::new`]: crate::Chain::new
///
/// # Examples
///
/// ```
/// use errtrail::{Code, chain};
///
/// const TIMEOUT: Code = Code::new(104);
///
/// let chain = chain!("connection dropped");
/// assert_eq!(chain.code(), Code::UNKNOWN);
///
/// let attempts = 3;
/// let chain = chain!(code = TIMEOUT, "gave up after {attempts} attempts");
/// assert_eq!(chain.message(), "gave up after 3 attempts");
/// assert!(chain.caller().function().is_some());
/// ```
#[macro_export]
macro_rules! chain {
    (code = $code:expr, $($arg:tt)+) => {
        $crate::__private::new_chain(
            $code,
            $crate::__private::format_args!($($arg)+),
            $crate::__function!(),
        )
    };
    ($($arg:tt)+) => {
        $crate::__private::new_chain(
            $crate::Code::UNKNOWN,
            $crate::__private::format_args!($($arg)+),
            $crate::__function!(),
        )
    };
}

/// Wraps an error with a new outermost node built from a format string.
///
/// The first argument is anything implementing
/// [`IntoChain`](crate::IntoChain). The remaining arguments are those of
/// [`chain!`].
///
/// # Examples
///
/// ```
/// use errtrail::{Code, wrap};
///
/// let io = std::io::Error::other("permission denied");
/// let chain = wrap!(io, code = Code::FATAL, "opening {}", "/etc/app.toml");
/// assert_eq!(chain.len(), 2);
/// assert_eq!(chain.message(), "opening /etc/app.toml");
/// ```
#[macro_export]
macro_rules! wrap {
    ($error:expr, code = $code:expr, $($arg:tt)+) => {
        $crate::__private::wrap_chain(
            $error,
            $code,
            $crate::__private::format_args!($($arg)+),
            $crate::__function!(),
        )
    };
    ($error:expr, $($arg:tt)+) => {
        $crate::__private::wrap_chain(
            $error,
            $crate::Code::UNKNOWN,
            $crate::__private::format_args!($($arg)+),
            $crate::__function!(),
        )
    };
}

/// Returns early with an error.
///
/// Constructs a chain using the same arguments as [`chain!`] and returns it
/// wrapped in an `Err`, converted with [`Into`].
///
/// # Examples
///
/// ```
/// use errtrail::{Chain, bail};
///
/// fn check_port(port: u16) -> Result<(), Chain> {
///     if port < 1024 {
///         bail!("port {port} is reserved");
///     }
///     Ok(())
/// }
///
/// assert_eq!(check_port(80).unwrap_err().message(), "port 80 is reserved");
/// assert!(check_port(8080).is_ok());
/// ```
#[macro_export]
macro_rules! bail {
    ($($args:tt)*) => {
        return $crate::__private::Err($crate::chain!($($args)*).into())
    };
}

/// The path of the function the macro is expanded in.
#[doc(hidden)]
#[macro_export]
macro_rules! __function {
    () => {{
        fn marker() {}
        $crate::__private::function_name($crate::__private::type_name_of(marker))
    }};
}

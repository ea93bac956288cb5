use alloc::borrow::Cow;

use crate::{Chain, Code, IntoChain};

mod sealed {
    pub trait Sealed {}
    impl<A, E> Sealed for Result<A, E> {}
}

/// Extension methods for annotating the error of a [`Result`].
///
/// ```
/// use errtrail::{Chain, Code, prelude::*};
///
/// fn parse(input: &str) -> Result<u16, Chain> {
///     input.trim().parse::<u16>().wrap("port is not a number")
/// }
///
/// let chain = parse("http").unwrap_err();
/// assert_eq!(chain.len(), 2);
/// assert_eq!(chain.message(), "port is not a number");
/// assert_eq!(chain.code(), Code::UNKNOWN);
/// ```
pub trait ResultExt<V, E>: sealed::Sealed {
    /// Converts the error into a [`Chain`].
    #[track_caller]
    #[must_use]
    fn into_chain(self) -> Result<V, Chain>
    where
        E: IntoChain;

    /// Adds a new outermost node carrying `message` and [`Code::UNKNOWN`].
    #[track_caller]
    #[must_use]
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Result<V, Chain>
    where
        E: IntoChain;

    /// Adds a new outermost node carrying `message` and `code`.
    #[track_caller]
    #[must_use]
    fn wrap_coded(self, code: Code, message: impl Into<Cow<'static, str>>) -> Result<V, Chain>
    where
        E: IntoChain;

    /// Like [`wrap`](Self::wrap), building the message only on error.
    #[track_caller]
    #[must_use]
    fn wrap_lazy<M, F>(self, message: F) -> Result<V, Chain>
    where
        E: IntoChain,
        F: FnOnce() -> M,
        M: Into<Cow<'static, str>>;

    /// Records that the error passed through the caller. See
    /// [`Chain::track`].
    #[track_caller]
    #[must_use]
    fn track(self) -> Result<V, Chain>
    where
        E: IntoChain;

    /// Replaces the outermost code of the error. See [`Chain::from_error`].
    #[track_caller]
    #[must_use]
    fn with_code(self, code: Code) -> Result<V, Chain>
    where
        E: IntoChain;
}

impl<V, E> ResultExt<V, E> for Result<V, E> {
    #[inline(always)]
    fn into_chain(self) -> Result<V, Chain>
    where
        E: IntoChain,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into_chain()),
        }
    }

    #[inline(always)]
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Result<V, Chain>
    where
        E: IntoChain,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into_chain().wrap(Code::UNKNOWN, message)),
        }
    }

    #[inline(always)]
    fn wrap_coded(self, code: Code, message: impl Into<Cow<'static, str>>) -> Result<V, Chain>
    where
        E: IntoChain,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into_chain().wrap(code, message)),
        }
    }

    #[inline(always)]
    fn wrap_lazy<M, F>(self, message: F) -> Result<V, Chain>
    where
        E: IntoChain,
        F: FnOnce() -> M,
        M: Into<Cow<'static, str>>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into_chain().wrap(Code::UNKNOWN, message())),
        }
    }

    #[inline(always)]
    fn track(self) -> Result<V, Chain>
    where
        E: IntoChain,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into_chain().track()),
        }
    }

    #[inline(always)]
    fn with_code(self, code: Code) -> Result<V, Chain>
    where
        E: IntoChain,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Chain::from_error(e, Some(code))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("no such table")]
    struct NoTable;

    fn query() -> Result<(), NoTable> {
        Err(NoTable)
    }

    #[test]
    fn test_wrap_records_caller() {
        let (result, line) = (query().wrap("listing users"), line!());
        let chain = result.unwrap_err();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.caller().line(), line);
        assert_eq!(chain.cause().frame().line(), line);
        assert_eq!(chain.cause().message(), "no such table");
    }

    #[test]
    fn test_wrap_coded_and_lazy() {
        let chain = query().wrap_coded(Code::new(500), "db").unwrap_err();
        assert_eq!(chain.code(), Code::new(500));

        let mut called = false;
        let ok: Result<u8, NoTable> = Ok(1);
        assert_eq!(
            ok.wrap_lazy(|| {
                called = true;
                "unused"
            })
            .unwrap(),
            1
        );
        assert!(!called);
    }

    #[test]
    fn test_track_and_with_code() {
        let chain = query().track().unwrap_err();
        assert_eq!(chain.len(), 2);

        let chain = Err::<(), _>(Chain::new("a")).with_code(Code::FATAL).unwrap_err();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.code(), Code::FATAL);
    }
}

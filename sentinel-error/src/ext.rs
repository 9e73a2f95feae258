//! Extension methods for `Result`

use crate::{NamedError, Wrapped};
use std::error::Error as StdError;

/// Wrap the error of a `Result` with an identity at the call site.
///
/// ```rust
/// use sentinel_error::{Kind, ResultExt};
///
/// const READ_CONFIG: Kind = Kind::new("read config");
///
/// let res: Result<(), std::io::Error> = Err(std::io::Error::other("denied"));
/// let err = res.wrap_err(READ_CONFIG).unwrap_err();
/// assert_eq!(err.to_string(), "read config: denied");
/// assert!(err.is(&READ_CONFIG));
/// ```
pub trait ResultExt<T> {
    /// Wrap the error with `head`
    fn wrap_err<H: NamedError>(self, head: H) -> Result<T, Wrapped>;

    /// Wrap the error with a head built only when there is an error
    fn wrap_err_with<H, F>(self, head: F) -> Result<T, Wrapped>
    where
        H: NamedError,
        F: FnOnce() -> H;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn wrap_err<H: NamedError>(self, head: H) -> Result<T, Wrapped> {
        self.map_err(|err| head.wrap(err))
    }

    fn wrap_err_with<H, F>(self, head: F) -> Result<T, Wrapped>
    where
        H: NamedError,
        F: FnOnce() -> H,
    {
        self.map_err(|err| head().wrap(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{args, Kind};
    use std::io;

    const LOAD: Kind = Kind::new("load %s");

    fn read(ok: bool) -> Result<u32, io::Error> {
        if ok {
            Ok(7)
        } else {
            Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
        }
    }

    #[test]
    fn test_wrap_err_passes_ok_through() {
        assert_eq!(read(true).wrap_err(LOAD).unwrap(), 7);
    }

    #[test]
    fn test_wrap_err() {
        let err = read(false).wrap_err(LOAD.with_args(["page"])).unwrap_err();
        assert_eq!(err.to_string(), "load page: missing");
        assert!(err.is(&LOAD));
        let cause = err.cause().unwrap().downcast_ref::<io::Error>().unwrap();
        assert_eq!(cause.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_wrap_err_with_is_lazy() {
        let mut built = false;
        let res = read(true).wrap_err_with(|| {
            built = true;
            LOAD.with_args(args!["x"])
        });
        assert!(res.is_ok());
        assert!(!built);

        let err = read(false)
            .wrap_err_with(|| LOAD.with_args(args!["y"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "load y: missing");
    }

    #[test]
    fn test_wrapped_results_chain() {
        const OUTER: Kind = Kind::new("outer");
        let err = read(false)
            .wrap_err(LOAD.error())
            .wrap_err(OUTER)
            .unwrap_err();
        assert_eq!(err.to_string(), "outer: load %s: missing");
        assert!(err.is(&LOAD));
        assert!(err.is(&OUTER));
    }
}

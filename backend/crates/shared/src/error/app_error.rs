//! [`AppError`]: the error every HTTP-facing crate converts into before it
//! reaches the client.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// Classified error with a client-safe message
///
/// The optional source is for logs only and never rendered.
///
/// ```
/// use kernel::error::app_error::AppError;
///
/// let err = AppError::conflict("email already registered");
/// assert_eq!(err.status_code(), 409);
/// assert_eq!(err.message(), "email already registered");
/// ```
#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }
}

macro_rules! kind_constructors {
    ($($name:ident => $kind:ident),* $(,)?) => {
        impl AppError {
            $(
                #[doc = concat!("[`ErrorKind::", stringify!($kind), "`] with the given message")]
                pub fn $name(message: impl Into<Cow<'static, str>>) -> Self {
                    Self::new(ErrorKind::$kind, message)
                }
            )*
        }
    };
}

kind_constructors! {
    bad_request => BadRequest,
    unauthorized => Unauthorized,
    not_found => NotFound,
    conflict => Conflict,
    internal => InternalServerError,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind.status_code())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

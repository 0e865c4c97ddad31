#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Two operand shapes cannot be broadcast together.
    #[error("cannot align shapes: dimension {dim} has size {a} in a and size {b} in b")]
    ShapeAlignment { dim: usize, a: usize, b: usize },

    /// The source of an assignment cannot be broadcast into the target.
    #[error("cannot assign: dimension {dim} has size {a} in the target and size {b} in the source")]
    AssignAlignment { dim: usize, a: usize, b: usize },

    #[error("shape holds {expected} elements but {got} values were given")]
    ShapeMismatch { expected: usize, got: usize },

    /// A dedicated vectorize pool could not be started.
    #[error("cannot build a pool of {threads} vectorize threads")]
    ThreadPool {
        threads: usize,
        #[source]
        source: rayon::ThreadPoolBuildError,
    },

    #[error("{inner}\n{backtrace}")]
    WithBacktrace {
        inner: Box<Self>,
        backtrace: Box<std::backtrace::Backtrace>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn bt(self) -> Self {
        let backtrace = std::backtrace::Backtrace::capture();
        match backtrace.status() {
            std::backtrace::BacktraceStatus::Disabled
            | std::backtrace::BacktraceStatus::Unsupported => self,
            _ => Self::WithBacktrace {
                inner: Box::new(self),
                backtrace: Box::new(backtrace),
            },
        }
    }

    /// The error with any backtrace wrapper removed.
    pub fn inner(&self) -> &Self {
        match self {
            Self::WithBacktrace { inner, .. } => inner.inner(),
            other => other,
        }
    }
}

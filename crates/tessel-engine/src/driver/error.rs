use std::fmt;

/// Error codes a driver can queue.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GpuErrorCode {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    InvalidFramebufferOperation,
    OutOfMemory,
    StackUnderflow,
    StackOverflow,
    Unknown,
}

impl GpuErrorCode {
    /// Symbolic name of the code.
    pub fn name(self) -> &'static str {
        match self {
            GpuErrorCode::InvalidEnum => "INVALID_ENUM",
            GpuErrorCode::InvalidValue => "INVALID_VALUE",
            GpuErrorCode::InvalidOperation => "INVALID_OPERATION",
            GpuErrorCode::InvalidFramebufferOperation => "INVALID_FRAMEBUFFER_OPERATION",
            GpuErrorCode::OutOfMemory => "OUT_OF_MEMORY",
            GpuErrorCode::StackUnderflow => "STACK_UNDERFLOW",
            GpuErrorCode::StackOverflow => "STACK_OVERFLOW",
            GpuErrorCode::Unknown => "UNKNOWN",
        }
    }

    /// What the code means, in one sentence.
    pub fn description(self) -> &'static str {
        match self {
            GpuErrorCode::InvalidEnum => {
                "An unacceptable value was given for an enumerated argument; the command was ignored."
            }
            GpuErrorCode::InvalidValue => {
                "A numeric argument is out of range; the command was ignored."
            }
            GpuErrorCode::InvalidOperation => {
                "The operation is not allowed in the current state; the command was ignored."
            }
            GpuErrorCode::InvalidFramebufferOperation => {
                "The framebuffer object is not complete; the command was ignored."
            }
            GpuErrorCode::OutOfMemory => {
                "There is not enough memory left to execute the command; GPU state is undefined."
            }
            GpuErrorCode::StackUnderflow => {
                "An operation would have caused an internal stack to underflow."
            }
            GpuErrorCode::StackOverflow => {
                "An operation would have caused an internal stack to overflow."
            }
            GpuErrorCode::Unknown => "Unknown error.",
        }
    }
}

/// One entry drained from a driver's error queue.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GpuError {
    pub code: GpuErrorCode,
    /// Extra driver text (validation message etc.), if the backend has one.
    pub detail: Option<String>,
}

impl GpuError {
    pub fn new(code: GpuErrorCode) -> Self {
        Self { code, detail: None }
    }

    pub fn with_detail(code: GpuErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: Some(detail.into()),
        }
    }
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.name(), self.code.description())?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

impl std::error::Error for GpuError {}

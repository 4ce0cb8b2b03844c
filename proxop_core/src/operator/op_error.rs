/// Operator errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpError
{
    /// Malformed compressed-sparse-column arrays.
    InvalidCsc,
    /// Declared dimensions disagree with the supplied data.
    DimMismatch,
    /// Block placed outside the enclosing operator or overlapping another block.
    InvalidPlacement,
    /// Coefficients which would make an element operation ill-defined.
    InvalidCoeff,
    /// Evaluated before `initialize` or after `release`.
    NotInitialized,
    /// Device memory could not be allocated.
    AllocFailure,
    /// Slice too short for the range an operator works on.
    OutOfRange,
}

impl core::fmt::Display for OpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            OpError::InvalidCsc       => "InvalidCsc: malformed compressed-sparse-column arrays",
            OpError::DimMismatch      => "DimMismatch: dimensions disagree with data",
            OpError::InvalidPlacement => "InvalidPlacement: block outside operator or overlapping",
            OpError::InvalidCoeff     => "InvalidCoeff: invalid element operation coefficients",
            OpError::NotInitialized   => "NotInitialized: evaluated outside initialize/release",
            OpError::AllocFailure     => "AllocFailure: device memory allocation failed",
            OpError::OutOfRange       => "OutOfRange: slice does not cover operator range",
        })
    }
}

//

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
impl std::error::Error for OpError {}

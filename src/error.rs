use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the partitioning algorithms and the instance generator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Fail with [Error::InvalidArgument] unless there is at least one group.
#[inline]
pub(crate) fn check_groups(n: usize) -> Result<()> {
    if n == 0 {
        return Err(Error::InvalidArgument("number of groups must be positive"));
    }
    Ok(())
}

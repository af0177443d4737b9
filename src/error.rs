use std::collections::TryReserveError;

/// Memory for a table or one of its records could not be obtained.
///
/// Returned before any state is touched: a failed `create` yields no table
/// and a failed `insert` leaves the size and every chain as they were.
#[derive(Debug)]
pub enum AllocError {
    /// The bucket array for `capacity` slots could not be reserved.
    Buckets {
        capacity: usize,
        source: TryReserveError,
    },

    /// Copying a record's key or text value (`bytes` long) failed.
    Record {
        bytes: usize,
        source: TryReserveError,
    },
}

impl std::fmt::Display for AllocError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocError::Buckets { capacity, .. } => {
                write!(f, "cannot allocate {capacity} buckets")
            }
            AllocError::Record { bytes, .. } => {
                write!(f, "cannot allocate {bytes} bytes for a record")
            }
        }
    }
}

impl std::error::Error for AllocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AllocError::Buckets { source, .. } | AllocError::Record { source, .. } => Some(source),
        }
    }
}

/// Table result
pub type Result<T> = std::result::Result<T, AllocError>;

/// Copy `s` into a fresh `String`, reporting allocation failure instead of aborting.
pub(crate) fn try_copy_str(s: &str) -> Result<String> {
    let mut out = String::new();
    out.try_reserve_exact(s.len())
        .map_err(|source| AllocError::Record {
            bytes: s.len(),
            source,
        })?;
    out.push_str(s);
    Ok(out)
}

//! Debug-only guard against nested entry into a table.
//!
//! A table calls into user code in exactly one place: the `BuildHasher`
//! that picks a bucket. If that code reaches back into the same table while
//! a chain is being scanned or relinked, the chain may be observed half
//! built. In debug builds the guard records which operation holds the table
//! and panics on a nested entry, naming both operations. In release builds
//! it compiles to nothing.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table tracker. Public entry points open a section with
/// `let _g = self.guard.enter("insert");`.
#[derive(Debug)]
pub(crate) struct SectionGuard {
    #[cfg(debug_assertions)]
    holder: Cell<Option<&'static str>>,
    // Tables are single-threaded; keep the tracker !Send + !Sync.
    _nosend: PhantomData<*mut ()>,
}

impl SectionGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            holder: Cell::new(None),
            _nosend: PhantomData,
        }
    }

    /// Open a section for operation `op`. Debug builds panic if another
    /// section of the same table is still open.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> Section<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(held) = self.holder.get() {
                panic!("table re-entered: `{op}` called while `{held}` is in progress");
            }
            self.holder.set(Some(op));
            return Section { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return Section { _z: PhantomData };
        }
    }

    /// Name of the operation currently holding the table, if any.
    #[cfg(all(debug_assertions, test))]
    fn holder(&self) -> Option<&'static str> {
        self.holder.get()
    }
}

impl Default for SectionGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII section returned by [`SectionGuard::enter`]; closes on drop.
pub(crate) struct Section<'a> {
    #[cfg(debug_assertions)]
    owner: &'a SectionGuard,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for Section<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.holder.get().is_some());
            self.owner.holder.set(None);
        }
    }
}

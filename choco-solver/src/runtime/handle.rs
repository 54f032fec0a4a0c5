use std::fmt::Display;
use std::fmt::Formatter;
use std::num::NonZeroU64;

use log::trace;

use super::Runtime;

/// An opaque reference to an object living inside a backend.
///
/// A handle is only meaningful to the backend which issued it. Null is never a valid handle; a
/// native call which may produce null returns `Option<NativeHandle>` instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(NonZeroU64);

impl NativeHandle {
    /// Creates a handle from its raw representation, returning `None` for null.
    pub fn new(raw: u64) -> Option<NativeHandle> {
        NonZeroU64::new(raw).map(NativeHandle)
    }

    /// The raw representation of the handle; never zero.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl Display for NativeHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

/// The unique owner of a [`NativeHandle`].
///
/// Dropping the owner releases the handle in the backend which issued it, unless that backend's
/// [`Runtime`] has been torn down in the meantime, in which case nothing is released. The handle
/// itself may be passed by value to any number of backend calls (see [`OwnedHandle::raw`]), but
/// only the owner ever releases it.
#[derive(Debug)]
pub struct OwnedHandle {
    handle: NativeHandle,
    runtime: Runtime,
}

impl OwnedHandle {
    pub(crate) fn new(runtime: Runtime, handle: NativeHandle) -> OwnedHandle {
        trace!("adopting handle {handle}");
        OwnedHandle { handle, runtime }
    }

    /// The wrapped handle, for use as an argument of backend calls.
    pub fn raw(&self) -> NativeHandle {
        self.handle
    }

    /// The runtime which issued the handle.
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        if self.runtime.is_initialized() {
            trace!("releasing handle {}", self.handle);
            self.runtime.backend_unchecked().destroy_handle(self.handle);
        } else {
            trace!("runtime torn down, handle {} is not released", self.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NativeHandle;

    #[test]
    fn null_is_not_a_handle() {
        assert_eq!(NativeHandle::new(0), None);
        assert_eq!(NativeHandle::new(7).map(NativeHandle::get), Some(7));
    }
}

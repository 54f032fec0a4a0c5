//! The [`Runtime`] ties every proxy to the backend which issued its handle.
//!
//! A runtime carries a lifecycle flag. While it is set, dropping an [`OwnedHandle`] releases the
//! handle in the backend and every proxy operation is forwarded. Once [`Runtime::cleanup`] has
//! cleared it, releases are skipped and operations fail with
//! [`ChocoError::RuntimeNotInitialized`] without reaching the backend.

mod handle;

use std::fmt::Debug;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub use handle::NativeHandle;
pub use handle::OwnedHandle;
use log::debug;

use crate::backend::Backend;
use crate::backend::ReferenceBackend;
use crate::error::ChocoError;
use crate::error::ChocoResult;
use crate::model::Model;

/// A cheaply clonable reference to a backend and its lifecycle flag.
#[derive(Clone, Debug)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

#[derive(Debug)]
struct RuntimeInner {
    backend: Box<dyn Backend>,
    initialized: AtomicBool,
}

impl Runtime {
    /// Initialises `backend` and wraps it in a runtime which reports itself as initialised.
    pub fn new(backend: impl Backend + 'static) -> Runtime {
        backend.init();
        Runtime {
            inner: Arc::new(RuntimeInner {
                backend: Box::new(backend),
                initialized: AtomicBool::new(true),
            }),
        }
    }

    /// A runtime over a fresh in-process [`ReferenceBackend`].
    pub fn reference() -> Runtime {
        Runtime::new(ReferenceBackend::default())
    }

    /// The process-wide runtime over the native Choco library, initialised on first use.
    #[cfg(feature = "native")]
    pub fn native() -> Runtime {
        use std::sync::OnceLock;

        use crate::backend::NativeBackend;

        static NATIVE: OnceLock<Runtime> = OnceLock::new();
        NATIVE
            .get_or_init(|| Runtime::new(NativeBackend::default()))
            .clone()
    }

    /// (Re-)initialises the backend; calling this on an initialised runtime has no effect besides
    /// forwarding the call.
    pub fn init(&self) {
        self.inner.backend.init();
        self.inner.initialized.store(true, Ordering::Release);
    }

    /// Tears the runtime down. From now on no handle is released and no call is forwarded.
    pub fn cleanup(&self) {
        if self.inner.initialized.swap(false, Ordering::AcqRel) {
            debug!("cleaning up the solver runtime");
            self.inner.backend.cleanup();
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.initialized.load(Ordering::Acquire)
    }

    /// Takes ownership of a handle freshly returned by the backend of this runtime.
    ///
    /// The handle must not be owned by any other [`OwnedHandle`].
    pub fn adopt(&self, handle: NativeHandle) -> OwnedHandle {
        OwnedHandle::new(self.clone(), handle)
    }

    pub(crate) fn adopt_option(&self, handle: Option<NativeHandle>) -> Option<OwnedHandle> {
        handle.map(|handle| self.adopt(handle))
    }

    /// Creates a new, empty model; without a name the backend picks a default one.
    pub fn create_model(&self, name: Option<&str>) -> ChocoResult<Model> {
        Model::new(self, name)
    }

    /// The backend, provided that the runtime is still initialised.
    pub(crate) fn backend(&self) -> ChocoResult<&dyn Backend> {
        if self.is_initialized() {
            Ok(self.backend_unchecked())
        } else {
            Err(ChocoError::RuntimeNotInitialized)
        }
    }

    pub(crate) fn backend_unchecked(&self) -> &dyn Backend {
        self.inner.backend.as_ref()
    }

    /// Whether both values refer to the same runtime.
    pub fn same_runtime(&self, other: &Runtime) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(feature = "std")]
use std::sync as impl_;

#[cfg(not(feature = "std"))]
use spin as impl_;

#[repr(transparent)]
pub(crate) struct ChainLock<T>(impl_::Mutex<T>);

#[repr(transparent)]
pub(crate) struct ChainLockGuard<'a, T>(impl_::MutexGuard<'a, T>);

impl<T> ChainLock<T> {
    #[must_use]
    pub(crate) const fn new(value: T) -> Self {
        Self(impl_::Mutex::new(value))
    }

    #[inline]
    pub(crate) fn lock(&self) -> ChainLockGuard<'_, T> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.lock();

        // A panic while holding the lock cannot leave a half-updated chain
        // behind: the value is only ever replaced whole.
        #[cfg(feature = "std")]
        let guard = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        ChainLockGuard(guard)
    }
}

impl<T> ChainLockGuard<'_, T> {
    #[inline]
    pub(crate) fn get(&self) -> &T {
        &self.0
    }

    #[inline]
    pub(crate) fn replace(&mut self, value: T) {
        *self.0 = value;
    }
}

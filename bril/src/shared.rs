use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

/// Shorthand for [Arc<RwLock<T>>], the way IR nodes point at each other.
///
/// ```
/// use bril::shared::Shared;
///
/// let lock: Shared<i64> = Shared::new(42.into());
/// assert_eq!(*lock.try_read().unwrap(), 42);
/// ```
pub type Shared<T> = Arc<RwLock<T>>;

/// Non-blocking access to a [Shared] value.
///
/// The IR is only written while it is being built (parsing or programmatic
/// construction). Verification only reads, so multiple readers never contend
/// with a writer and a failed `try_read` means the IR is being mutated while
/// it is verified. That is a bug in the caller, so these methods panic
/// instead of blocking.
///
/// ```
/// use bril::shared::Shared;
/// use bril::shared::SharedExt;
///
/// let lock: Shared<i64> = Shared::new(42.into());
/// assert_eq!(*lock.rd(), 42);
/// *lock.wr() = 43;
/// assert_eq!(*lock.rd(), 43);
/// ```
pub trait SharedExt<T: ?Sized> {
    fn rd(&self) -> RwLockReadGuard<T>;
    fn wr(&self) -> RwLockWriteGuard<T>;
}

impl<T: ?Sized> SharedExt<T> for Shared<T> {
    fn rd(&self) -> RwLockReadGuard<T> {
        self.try_read().expect("IR node is locked for writing")
    }
    fn wr(&self) -> RwLockWriteGuard<T> {
        self.try_write().expect("IR node is already locked")
    }
}

#[test]
fn test_shared() {
    let lock: Shared<i64> = Shared::new(42.into());
    assert_eq!(*lock.rd(), 42);
    {
        let _first = lock.rd();
        let second = lock.rd();
        assert_eq!(*second, 42);
    }
    *lock.wr() += 1;
    assert_eq!(*lock.rd(), 43);
}

//! Serialized access to a parameter table shared between tasks.
//!
//! A `ParamTable` is not reentrant: every create, change, delete and init must
//! run to completion before the next one starts. The `SharedState` trait wraps
//! a table behind a lock that is held for the whole closure, so one closure is
//! one operation.

/// Platform-agnostic synchronized state access.
///
/// Implementations:
/// - `EmbassyState<T>` for embedded targets using Embassy's critical-section Mutex
/// - `MockState<T>` for host testing using RefCell (single-threaded)
///
/// # Example
///
/// ```
/// use nvparam::core::parameters::{ParamError, ParamTable, ParamValue, TableConfig, TableTag};
/// use nvparam::core::traits::{MockState, SharedState};
/// use nvparam::platform::mock::MockRom;
/// use nvparam::platform::RomInterface;
///
/// fn bump_boot_count<S, R>(shared: &S) -> Result<ParamValue, ParamError>
/// where
///     S: SharedState<ParamTable<'static, R>>,
///     R: RomInterface,
/// {
///     shared.with_mut(|table| {
///         let count = table.create("BOOT_CNT", ParamValue::U32(0))?;
///         let next = count.as_u32().unwrap_or(0) + 1;
///         table.change("BOOT_CNT", ParamValue::U32(next))
///     })
/// }
///
/// let ram: &'static mut [u8] = Box::leak(Box::new([0u8; 256]));
/// let config = TableConfig::new(TableTag::new("SHARED").unwrap());
/// let table = ParamTable::init(config, ram, MockRom::<512>::new()).unwrap();
/// let shared = MockState::new(table);
///
/// assert_eq!(bump_boot_count(&shared), Ok(ParamValue::U32(1)));
/// assert_eq!(bump_boot_count(&shared), Ok(ParamValue::U32(2)));
/// ```
pub trait SharedState<T> {
    /// Access state immutably while holding the lock.
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R;

    /// Access state mutably while holding the lock.
    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R;
}

// ============================================================================
// Embassy Implementation
// ============================================================================

#[cfg(feature = "embassy")]
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

/// Embassy-based shared state using a critical-section Mutex.
///
/// The critical section is held for the whole closure, so a table operation
/// cannot be interleaved with another one from an interrupt or another task.
/// Sync retries run inside the critical section; keep `max_retry` small.
#[cfg(feature = "embassy")]
pub struct EmbassyState<T> {
    inner: Mutex<CriticalSectionRawMutex, core::cell::RefCell<T>>,
}

#[cfg(feature = "embassy")]
impl<T> EmbassyState<T> {
    /// Creates a new `EmbassyState` wrapping the given value.
    ///
    /// This is a const fn, allowing static initialization.
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(core::cell::RefCell::new(value)),
        }
    }
}

#[cfg(feature = "embassy")]
impl<T> SharedState<T> for EmbassyState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.lock(|cell| f(&cell.borrow()))
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock shared state using RefCell for single-threaded testing.
///
/// # Panics
///
/// Panics if an operation is started from inside another one on the same
/// state (nested `with_mut`). That is the reentrancy the real lock forbids.
pub struct MockState<T> {
    inner: core::cell::RefCell<T>,
}

impl<T> MockState<T> {
    /// Creates a new `MockState` wrapping the given value.
    pub fn new(value: T) -> Self {
        Self {
            inner: core::cell::RefCell::new(value),
        }
    }

    /// Unwraps the inner value.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T> SharedState<T> for MockState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.borrow())
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(&mut self.inner.borrow_mut())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

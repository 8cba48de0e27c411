//! The provider/accessor pair.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ConfigurationError;
use crate::future::Scoped;
use crate::registry::{self, ContextId, MountId};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(0);

/// A named slot of shared state that can only be read inside a provider.
///
/// Each instance is distinct: two contexts over the same `T` never see each
/// other's values. The handle itself is `Copy + Send + Sync` so it can live in
/// a `static`; provided values stay on the thread that mounted them.
///
/// ## Examples
///
/// ```rust
/// use scoped_context::create_scoped_context;
///
/// let theme = create_scoped_context::<&'static str>("Theme");
///
/// assert!(theme.use_value().is_err());
///
/// theme.scope("dark", || {
///     assert_eq!(theme.use_value().unwrap(), "dark");
///
///     theme.scope("high-contrast", || {
///         assert_eq!(theme.use_value().unwrap(), "high-contrast");
///     });
///
///     assert_eq!(theme.use_value().unwrap(), "dark");
/// });
/// ```
pub struct ScopedContext<T> {
    id: ContextId,
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for ScopedContext<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ScopedContext<T> {}

impl<T> fmt::Debug for ScopedContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedContext")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish()
    }
}

impl<T: Clone + 'static> ScopedContext<T> {
    /// Creates a new, independent context. `name` appears in error messages.
    pub fn new(name: &'static str) -> Self {
        Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            name,
            _value: PhantomData,
        }
    }

    /// Returns the name used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Mounts `value` until the returned guard is dropped.
    ///
    /// Nested mounts shadow outer ones; dropping a guard removes exactly its
    /// own mount, even when guards are dropped out of order.
    ///
    /// ## Async code
    ///
    /// The mount belongs to the thread, not to a task. A guard held across an
    /// `.await` on a single-threaded executor (`current_thread`, `LocalSet`)
    /// exposes the value to every task polled on that thread until the guard
    /// drops, including sibling tasks that are not nested under this provider.
    /// Async callers should use [`scope_future`](Self::scope_future), which
    /// mounts the value only while its own future is being polled.
    #[must_use = "the value is unmounted as soon as the guard is dropped"]
    pub fn provide(&self, value: T) -> ProviderGuard<T> {
        self.mount(Rc::new(value))
    }

    /// Runs `f` with `value` provided.
    pub fn scope<R>(&self, value: T, f: impl FnOnce() -> R) -> R {
        let _guard = self.provide(value);
        f()
    }

    /// Wraps `future` so `value` is provided while it is being polled.
    ///
    /// The value is mounted at the start of every poll and unmounted at its
    /// end, so other tasks interleaved on the same thread never observe it.
    pub fn scope_future<F: Future>(&self, value: T, future: F) -> Scoped<T, F> {
        Scoped::new(*self, Rc::new(value), future)
    }

    /// Returns a clone of the innermost provided value.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigurationError::MissingProvider`] when no provider is
    /// mounted on this thread. The outcome is deterministic: it depends only
    /// on the mounts currently active.
    pub fn use_value(&self) -> Result<T, ConfigurationError> {
        self.with_value(T::clone)
    }

    /// Like [`use_value`](Self::use_value), but a missing provider is fatal.
    ///
    /// ## Panics
    ///
    /// Panics with the [`ConfigurationError`] message, naming this context.
    #[track_caller]
    pub fn expect_value(&self) -> T {
        match self.use_value() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Borrows the innermost provided value without cloning it.
    ///
    /// `f` may itself provide or read contexts, including this one.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, ConfigurationError> {
        let value = registry::current(self.id)
            .and_then(|value| value.downcast::<T>().ok())
            .ok_or(ConfigurationError::MissingProvider { context: self.name })?;
        Ok(f(&value))
    }

    /// Returns `true` if a provider is mounted on this thread.
    pub fn is_provided(&self) -> bool {
        self.depth() > 0
    }

    /// Returns how many providers of this context are currently mounted.
    pub fn depth(&self) -> usize {
        registry::depth(self.id)
    }

    pub(crate) fn mount(&self, value: Rc<T>) -> ProviderGuard<T> {
        let value: Rc<dyn Any> = value;
        let (mount_id, depth) = registry::mount(self.id, value);
        tracing::trace!(context = self.name, depth, "provider mounted");

        ProviderGuard {
            context: *self,
            mount_id,
            _not_send: PhantomData,
        }
    }
}

/// Creates a new scoped context named `name`.
///
/// Shorthand for [`ScopedContext::new`].
pub fn create_scoped_context<T: Clone + 'static>(name: &'static str) -> ScopedContext<T> {
    ScopedContext::new(name)
}

/// A mounted provider. Dropping it unmounts the value.
///
/// Guards are tied to the thread that created them.
pub struct ProviderGuard<T> {
    context: ScopedContext<T>,
    mount_id: MountId,
    _not_send: PhantomData<Rc<()>>,
}

impl<T> ProviderGuard<T> {
    /// Returns the context this guard provides.
    pub fn context(&self) -> ScopedContext<T> {
        self.context
    }
}

impl<T> fmt::Debug for ProviderGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderGuard")
            .field("context", &self.context.name)
            .field("mount_id", &self.mount_id)
            .finish()
    }
}

impl<T> Drop for ProviderGuard<T> {
    fn drop(&mut self) {
        let depth = registry::unmount(self.context.id, self.mount_id);
        tracing::trace!(context = self.context.name, depth, "provider unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    struct Account {
        id: u32,
    }

    #[test]
    fn test_missing_provider_names_context() {
        let account = create_scoped_context::<Account>("CurrentAccount");

        for _ in 0..3 {
            let err = account.use_value().unwrap_err();
            assert_eq!(
                err,
                ConfigurationError::MissingProvider {
                    context: "CurrentAccount"
                }
            );
        }
        assert!(!account.is_provided());
    }

    #[test]
    #[should_panic(expected = "context `Session` was read outside of any provider")]
    fn test_expect_value_panics() {
        let session = create_scoped_context::<String>("Session");
        let _ = session.expect_value();
    }

    #[test]
    fn test_nested_shadowing_and_restore() {
        let account = create_scoped_context::<Account>("CurrentAccount");

        let outer = account.provide(Account { id: 1 });
        assert_eq!(account.use_value().unwrap(), Account { id: 1 });

        {
            let _inner = account.provide(Account { id: 2 });
            assert_eq!(account.use_value().unwrap(), Account { id: 2 });
            assert_eq!(account.depth(), 2);
        }

        assert_eq!(account.use_value().unwrap(), Account { id: 1 });
        drop(outer);
        assert!(account.use_value().is_err());
    }

    #[test]
    fn test_out_of_order_drop() {
        let ctx = create_scoped_context::<u8>("Level");
        let outer = ctx.provide(1);
        let inner = ctx.provide(2);

        drop(outer);
        assert_eq!(ctx.use_value().unwrap(), 2);
        drop(inner);
        assert!(!ctx.is_provided());
    }

    #[test]
    fn test_contexts_of_same_type_are_independent() {
        let locale = create_scoped_context::<String>("Locale");
        let region = create_scoped_context::<String>("Region");

        locale.scope("en-GB".to_string(), || {
            assert_eq!(locale.use_value().unwrap(), "en-GB");
            assert_eq!(region.use_value().unwrap_err().context(), "Region");
        });
    }

    #[test]
    fn test_with_value_allows_reentrant_mounts() {
        let ctx = create_scoped_context::<u32>("Counter");
        ctx.scope(1, || {
            let seen = ctx
                .with_value(|outer| ctx.scope(outer + 1, || ctx.use_value().unwrap()))
                .unwrap();
            assert_eq!(seen, 2);
            assert_eq!(ctx.use_value().unwrap(), 1);
        });
    }

    #[test]
    fn test_caller_managed_mutable_cell() {
        let ctx = create_scoped_context::<Rc<RefCell<Vec<&'static str>>>>("Log");
        let log = Rc::new(RefCell::new(Vec::new()));

        ctx.scope(Rc::clone(&log), || {
            ctx.with_value(|cell| cell.borrow_mut().push("first")).unwrap();
            ctx.use_value().unwrap().borrow_mut().push("second");
        });

        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_values_do_not_cross_threads() {
        let ctx = create_scoped_context::<u32>("ThreadBound");
        let _guard = ctx.provide(7);

        let seen = std::thread::spawn(move || ctx.is_provided()).join().unwrap();
        assert!(!seen);
        assert!(ctx.is_provided());
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_mounts_are_traced() {
        let ctx = create_scoped_context::<u32>("Traced");
        ctx.scope(1, || {});

        assert!(logs_contain("provider mounted"));
        assert!(logs_contain("provider unmounted"));
    }
}

//! Carrying a provided value across `.await` points.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use crate::context::ScopedContext;

/// Future returned by [`ScopedContext::scope_future`].
///
/// The value is mounted only for the duration of each `poll`, so it is
/// visible to the wrapped future and to nothing else sharing the thread.
#[must_use = "futures do nothing unless polled"]
pub struct Scoped<T, F> {
    context: ScopedContext<T>,
    value: Rc<T>,
    future: Pin<Box<F>>,
}

impl<T: Clone + 'static, F: Future> Scoped<T, F> {
    pub(crate) fn new(context: ScopedContext<T>, value: Rc<T>, future: F) -> Self {
        Self {
            context,
            value,
            future: Box::pin(future),
        }
    }
}

impl<T: Clone + 'static, F: Future> Future for Scoped<T, F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let _guard = this.context.mount(Rc::clone(&this.value));
        this.future.as_mut().poll(cx)
    }
}

impl<T, F> fmt::Debug for Scoped<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scoped")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

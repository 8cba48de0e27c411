//! Thread-local mount stacks, one per context id.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

pub(crate) type ContextId = u64;
pub(crate) type MountId = u64;

struct Mount {
    id: MountId,
    value: Rc<dyn Any>,
}

thread_local! {
    static MOUNTS: RefCell<HashMap<ContextId, Vec<Mount>>> = RefCell::new(HashMap::new());
    static NEXT_MOUNT_ID: Cell<MountId> = const { Cell::new(0) };
}

/// Pushes `value` on top of `context`'s stack and returns the new mount id
/// together with the resulting depth.
pub(crate) fn mount(context: ContextId, value: Rc<dyn Any>) -> (MountId, usize) {
    let id = NEXT_MOUNT_ID.with(|next| {
        let id = next.get();
        next.set(id.wrapping_add(1));
        id
    });

    MOUNTS.with(|mounts| {
        let mut mounts = mounts.borrow_mut();
        let stack = mounts.entry(context).or_default();
        stack.push(Mount { id, value });
        (id, stack.len())
    })
}

/// Removes exactly the mount `id`, wherever it sits in the stack, and returns
/// the remaining depth.
///
/// The removed value is dropped after the registry borrow is released, and
/// calls during thread-local teardown are ignored.
pub(crate) fn unmount(context: ContextId, id: MountId) -> usize {
    let removed = MOUNTS.try_with(|mounts| {
        let mut mounts = mounts.borrow_mut();
        let Some(stack) = mounts.get_mut(&context) else {
            return (None, 0);
        };
        let removed = stack
            .iter()
            .position(|mount| mount.id == id)
            .map(|pos| stack.remove(pos));
        let depth = stack.len();
        if depth == 0 {
            mounts.remove(&context);
        }
        (removed, depth)
    });

    match removed {
        Ok((removed, depth)) => {
            drop(removed);
            depth
        }
        Err(_) => 0,
    }
}

/// Returns the innermost value for `context`, if any.
///
/// The value is cloned out so no borrow of the registry outlives this call;
/// callers may mount or read other contexts while holding it.
pub(crate) fn current(context: ContextId) -> Option<Rc<dyn Any>> {
    MOUNTS.with(|mounts| {
        mounts
            .borrow()
            .get(&context)
            .and_then(|stack| stack.last())
            .map(|mount| Rc::clone(&mount.value))
    })
}

pub(crate) fn depth(context: ContextId) -> usize {
    MOUNTS.with(|mounts| mounts.borrow().get(&context).map_or(0, Vec::len))
}

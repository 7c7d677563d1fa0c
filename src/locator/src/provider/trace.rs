use std::any::TypeId;
use std::cell::RefCell;

use crate::ServiceError;

thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    owner: usize,
    type_id: TypeId,
}

/// Marks an implementation type as being constructed by one provider on the
/// current thread, for as long as the guard lives.
///
/// Frames of different owners never collide, so providers nested inside each
/// other keep separate traces.
pub(crate) struct ResolutionGuard {
    frame: Frame,
}

impl ResolutionGuard {
    pub(crate) fn enter(
        owner: usize,
        type_id: TypeId,
        name: &'static str,
    ) -> Result<Self, ServiceError> {
        let frame = Frame { owner, type_id };
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.contains(&frame) {
                tracing::debug!(name, depth = stack.len(), "cyclic dependency detected");
                return Err(ServiceError::CyclicDependency { name });
            }
            stack.push(frame);
            Ok(Self { frame })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(position) = stack.iter().rposition(|frame| *frame == self.frame) {
                stack.remove(position);
            }
        });
    }
}

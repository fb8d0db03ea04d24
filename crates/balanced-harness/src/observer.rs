#![forbid(unsafe_code)]

//! Recording resize observer.

use std::cell::RefCell;
use std::rc::Rc;

use balanced_core::{HostError, NodeId, ResizeObserver};

/// What the controller asked of the observer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObserverLog {
    /// Nodes currently observed.
    pub observing: Vec<NodeId>,
    /// Every `observe` call, in order.
    pub observe_calls: Vec<NodeId>,
    /// Number of `disconnect` calls.
    pub disconnects: usize,
}

/// A [`ResizeObserver`] that records calls into a shared [`ObserverLog`].
///
/// The host (the test) delivers notifications itself; use
/// [`is_observing`](Self::is_observing) to decide whether it should.
#[derive(Debug, Clone)]
pub struct SimResizeObserver {
    log: Rc<RefCell<ObserverLog>>,
    available: bool,
}

impl Default for SimResizeObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimResizeObserver {
    /// An observer backed by a working host primitive.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(ObserverLog::default())),
            available: true,
        }
    }

    /// An observer whose host lacks resize notifications.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Whether `node` is currently observed.
    #[must_use]
    pub fn is_observing(&self, node: NodeId) -> bool {
        self.log.borrow().observing.contains(&node)
    }

    /// Snapshot of the call log.
    #[must_use]
    pub fn log(&self) -> ObserverLog {
        self.log.borrow().clone()
    }
}

impl ResizeObserver for SimResizeObserver {
    fn observe(&mut self, node: NodeId) -> Result<(), HostError> {
        if !self.available {
            return Err(HostError::CapabilityUnavailable("resize observer"));
        }
        let mut log = self.log.borrow_mut();
        log.observe_calls.push(node);
        if !log.observing.contains(&node) {
            log.observing.push(node);
        }
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut log = self.log.borrow_mut();
        log.observing.clear();
        log.disconnects += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_then_disconnect() {
        let mut observer = SimResizeObserver::new();
        let handle = observer.clone();
        observer.observe(NodeId::new(1)).unwrap();
        assert!(handle.is_observing(NodeId::new(1)));

        observer.disconnect();
        assert!(!handle.is_observing(NodeId::new(1)));
        assert_eq!(handle.log().disconnects, 1);
    }

    #[test]
    fn unavailable_refuses() {
        let mut observer = SimResizeObserver::unavailable();
        assert!(matches!(
            observer.observe(NodeId::new(1)),
            Err(HostError::CapabilityUnavailable(_))
        ));
        assert!(observer.log().observe_calls.is_empty());
    }
}

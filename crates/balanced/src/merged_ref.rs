#![forbid(unsafe_code)]

//! Fan one element reference out to several receivers.
//!
//! A caller that wraps an element in [`Balanced`](crate::Balanced) may still
//! want the element handle for itself. [`MergedRef`] delivers every
//! attach (`Some`) and detach (`None`) to each registered slot in order.

use std::fmt;

/// A receiver of element references.
pub type RefSlot<T> = Box<dyn FnMut(Option<&T>)>;

/// Ordered set of reference receivers.
pub struct MergedRef<T> {
    slots: Vec<RefSlot<T>>,
}

impl<T> Default for MergedRef<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> fmt::Debug for MergedRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedRef")
            .field("slots", &self.slots.len())
            .finish()
    }
}

impl<T> MergedRef<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slot after the existing ones.
    pub fn push(&mut self, slot: impl FnMut(Option<&T>) + 'static) {
        self.slots.push(Box::new(slot));
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, slot: impl FnMut(Option<&T>) + 'static) -> Self {
        self.push(slot);
        self
    }

    /// Deliver `value` to every slot.
    pub fn set(&mut self, value: Option<&T>) {
        for slot in &mut self.slots {
            slot(value);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn every_slot_sees_every_value_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let a = Rc::clone(&seen);
        let b = Rc::clone(&seen);
        let mut merged = MergedRef::new()
            .with(move |v: Option<&u32>| a.borrow_mut().push(("a", v.copied())))
            .with(move |v: Option<&u32>| b.borrow_mut().push(("b", v.copied())));

        merged.set(Some(&7));
        merged.set(None);

        assert_eq!(
            *seen.borrow(),
            vec![("a", Some(7)), ("b", Some(7)), ("a", None), ("b", None)]
        );
    }

    #[test]
    fn empty_merge_is_a_no_op() {
        let mut merged: MergedRef<u32> = MergedRef::new();
        merged.set(Some(&1));
        assert!(merged.is_empty());
    }
}

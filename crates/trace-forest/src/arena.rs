//! Slot arena with index reuse.
//!
//! Nodes are addressed by `u32` handles. Freed slots go on a free list and
//! are handed out again by the next [`Arena::alloc`].

#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn alloc(&mut self, element: T) -> u32 {
        if let Some(i) = self.free.pop() {
            self.slots[i as usize] = Some(element);
            i
        } else {
            assert!(
                self.slots.len() < u32::MAX as usize,
                "`Arena::alloc()` - arena is at maximum capacity"
            );
            self.slots.push(Some(element));
            (self.slots.len() - 1) as u32
        }
    }

    #[inline]
    pub(crate) fn get(&self, i: u32) -> &T {
        self.slots[i as usize]
            .as_ref()
            .expect("`Arena::get()` - handle is invalid")
    }

    #[inline]
    pub(crate) fn try_get(&self, i: u32) -> Option<&T> {
        self.slots.get(i as usize).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, i: u32) -> &mut T {
        self.slots[i as usize]
            .as_mut()
            .expect("`Arena::get_mut()` - handle is invalid")
    }

    pub(crate) fn take(&mut self, i: u32) -> T {
        let element = self.slots[i as usize]
            .take()
            .expect("`Arena::take()` - handle is invalid");
        self.free.push(i);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freed_slots_are_reused() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.take(a), 1);
        assert_eq!(arena.len(), 1);
        assert!(arena.try_get(a).is_none());
        let c = arena.alloc(3);
        assert_eq!(c, a);
        assert_eq!(*arena.get(c), 3);
        assert_eq!(*arena.get(b), 2);
        *arena.get_mut(b) = 20;
        assert_eq!(*arena.get(b), 20);
        arena.clear();
        assert_eq!(arena.len(), 0);
    }
}

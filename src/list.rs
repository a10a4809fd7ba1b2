use core::fmt;

/// Slot index of the sentinel. It never leaves the list.
pub const SENTINEL: usize = 0;

/// A link in the arena.
///
/// Contains an optional value and the indices of the previous and next links.
/// The sentinel and free slots hold no value.
struct Link<T> {
    val: Option<T>,
    prev: usize,
    next: usize,
}

impl<T> Link<T> {
    fn new_sigil() -> Self {
        Link {
            val: None,
            prev: SENTINEL,
            next: SENTINEL,
        }
    }
}

/// A circular doubly linked list stored in an index arena.
///
/// Slot [`SENTINEL`] anchors the ring: `sentinel.next` is the front (least
/// recent) and `sentinel.prev` the back (most recent). Removed slots go on a
/// free list and are reused, so a slot index is only meaningful while its
/// value is linked. Callers keep the slot next to their value and must clear
/// it when the value is removed.
///
/// ```ignore
/// let mut list = List::with_capacity(4);
/// let a = list.push_back("a");
/// list.push_back("b");
/// list.move_to_back(a);
/// assert_eq!(list.pop_front(), Some("b"));
/// ```
pub struct List<T> {
    links: Vec<Link<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> List<T> {
    /// Creates an empty list with room for `cap` values before reallocating.
    pub fn with_capacity(cap: usize) -> List<T> {
        let mut links = Vec::with_capacity(cap + 1);
        links.push(Link::new_sigil());
        List {
            links,
            free: Vec::new(),
            len: 0,
        }
    }

    /// Returns the current number of values in the list.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list contains no values.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the slot at the front of the list, if any.
    pub fn front_slot(&self) -> Option<usize> {
        match self.links[SENTINEL].next {
            SENTINEL => None,
            slot => Some(slot),
        }
    }

    /// Returns the value stored in `slot`, if it is linked.
    pub fn get(&self, slot: usize) -> Option<&T> {
        self.links.get(slot).and_then(|link| link.val.as_ref())
    }

    /// Links a value before the sentinel, making it the back of the list.
    ///
    /// Returns the slot the value occupies.
    pub fn push_back(&mut self, v: T) -> usize {
        let slot = match self.free.pop() {
            Some(slot) => {
                self.links[slot].val = Some(v);
                slot
            }
            None => {
                self.links.push(Link {
                    val: Some(v),
                    prev: SENTINEL,
                    next: SENTINEL,
                });
                self.links.len() - 1
            }
        };
        self.attach_last(slot);
        self.len += 1;
        slot
    }

    /// Unlinks the value in `slot` and returns it.
    ///
    /// Returns `None` for the sentinel, out-of-range or free slots.
    pub fn remove(&mut self, slot: usize) -> Option<T> {
        if slot == SENTINEL {
            return None;
        }
        let val = self.links.get_mut(slot)?.val.take()?;
        self.detach(slot);
        self.free.push(slot);
        self.len -= 1;
        Some(val)
    }

    /// Unlinks and returns the front value.
    pub fn pop_front(&mut self) -> Option<T> {
        let slot = self.front_slot()?;
        self.remove(slot)
    }

    /// Moves the value in `slot` to the back of the list.
    ///
    /// Does nothing for the sentinel or a free slot.
    pub fn move_to_back(&mut self, slot: usize) {
        if slot == SENTINEL || self.get(slot).is_none() {
            return;
        }
        // Already the most recent
        if self.links[SENTINEL].prev == slot {
            return;
        }
        self.detach(slot);
        self.attach_last(slot);
    }

    /// Iterates from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.links[SENTINEL].next,
            back: self.links[SENTINEL].prev,
            remaining: self.len,
        }
    }

    fn detach(&mut self, slot: usize) {
        let (prev, next) = (self.links[slot].prev, self.links[slot].next);
        self.links[prev].next = next;
        self.links[next].prev = prev;
        self.links[slot].prev = SENTINEL;
        self.links[slot].next = SENTINEL;
    }

    fn attach_last(&mut self, slot: usize) {
        let last = self.links[SENTINEL].prev;
        self.links[slot].prev = last;
        self.links[slot].next = SENTINEL;
        self.links[last].next = slot;
        self.links[SENTINEL].prev = slot;
    }
}

/// Front-to-back iterator over a [`List`].
pub struct Iter<'a, T> {
    list: &'a List<T>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let link = &self.list.links[self.front];
        self.front = link.next;
        self.remaining -= 1;
        link.val.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let link = &self.list.links[self.back];
        self.back = link.prev;
        self.remaining -= 1;
        link.val.as_ref()
    }
}

impl<T> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("length", &self.len)
            .field("slots", &(self.links.len() - 1))
            .field("free", &self.free.len())
            .finish()
    }
}

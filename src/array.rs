//! Owning, growable array of string-like elements
//!
//! Storage is a boxed block of `capacity` slots. Slots `[0, count)` hold live
//! handles, the rest are empty. Growth doubles the block and moves handles
//! across; elements are never duplicated.

use std::collections::TryReserveError;
use std::fmt;
use std::mem;

use bstr::{BStr, BString};
use tracing::{debug, trace};

use crate::error::{DynarrError, Result};

#[derive(Debug)]
pub struct DynamicArray<T = BString> {
    /// Backing block, always `capacity` slots long
    slots: Box<[Option<T>]>,
    /// Number of live slots at the front of the block
    count: usize,
    /// Handles moved by growth since creation
    handles_moved: usize,
}

/// Allocate `capacity` empty slots without aborting on allocation failure
fn empty_slots<T>(capacity: usize) -> std::result::Result<Box<[Option<T>]>, TryReserveError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, || None);
    Ok(slots.into_boxed_slice())
}

impl<T> DynamicArray<T> {
    /// Largest block whose byte size still fits in `isize`
    pub const MAX_CAPACITY: usize = {
        let slot = mem::size_of::<Option<T>>();
        isize::MAX as usize / if slot == 0 { 1 } else { slot }
    };

    /// Create an empty array with room for `capacity` elements
    ///
    /// Fails with `InvalidArgument` for zero, for capacities above
    /// `MAX_CAPACITY`, and when the block cannot be allocated.
    pub fn create(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DynarrError::InvalidArgument(
                "capacity must be >= 1".to_string(),
            ));
        }
        if capacity > Self::MAX_CAPACITY {
            return Err(DynarrError::InvalidArgument(format!(
                "capacity {} exceeds maximum of {}",
                capacity,
                Self::MAX_CAPACITY
            )));
        }

        let slots = empty_slots(capacity).map_err(|e| {
            DynarrError::InvalidArgument(format!("cannot allocate {} slots: {}", capacity, e))
        })?;

        trace!(capacity, "created array");
        Ok(Self {
            slots,
            count: 0,
            handles_moved: 0,
        })
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of allocated slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Total handles moved into new blocks by growth
    pub fn handles_moved(&self) -> usize {
        self.handles_moved
    }

    /// Borrow the element at `index`
    pub fn read(&self, index: usize) -> Result<&T> {
        if index >= self.count {
            return Err(DynarrError::out_of_range(index, self.count));
        }
        self.slots[index]
            .as_ref()
            .ok_or_else(|| DynarrError::out_of_range(index, self.count))
    }

    /// Insert `element` at `index`, shifting the tail one slot right
    ///
    /// `index == len()` appends. Fails without touching the array when
    /// `index > len()`.
    pub fn insert(&mut self, index: usize, element: impl Into<T>) -> Result<()> {
        if index > self.count {
            return Err(DynarrError::out_of_range(index, self.count));
        }
        if self.count == self.capacity() {
            self.grow()?;
        }

        // Highest slot first so nothing is overwritten before it moves
        for i in (index..self.count).rev() {
            self.slots[i + 1] = self.slots[i].take();
        }
        self.slots[index] = Some(element.into());
        self.count += 1;

        trace!(index, count = self.count, "inserted element");
        Ok(())
    }

    /// Add `element` after the last live slot
    pub fn append(&mut self, element: impl Into<T>) -> Result<()> {
        if self.count == self.capacity() {
            self.grow()?;
        }
        self.slots[self.count] = Some(element.into());
        self.count += 1;

        trace!(count = self.count, "appended element");
        Ok(())
    }

    /// Double the capacity, moving live handles into the new block
    ///
    /// The array is untouched when the doubled block cannot exist or cannot
    /// be allocated.
    pub fn grow(&mut self) -> Result<()> {
        let old_capacity = self.capacity();
        let new_capacity =
            Self::next_capacity(old_capacity).ok_or(DynarrError::CapacityOverflow {
                capacity: old_capacity,
            })?;

        let mut slots = empty_slots(new_capacity).map_err(|_| DynarrError::CapacityOverflow {
            capacity: old_capacity,
        })?;
        for (dst, src) in slots.iter_mut().zip(self.slots[..self.count].iter_mut()) {
            *dst = src.take();
        }
        self.handles_moved += self.count;

        debug!(
            from = old_capacity,
            to = new_capacity,
            moved = self.count,
            "grew array"
        );
        // Old block only holds empty slots by now
        self.slots = slots;
        Ok(())
    }

    /// Doubled capacity, or `None` past `MAX_CAPACITY`
    fn next_capacity(capacity: usize) -> Option<usize> {
        capacity
            .checked_mul(2)
            .map(|c| c.max(1))
            .filter(|c| *c <= Self::MAX_CAPACITY)
    }

    /// Release every element, then the storage
    ///
    /// Returns how many elements were released.
    pub fn destroy(mut self) -> usize {
        let released = self.release_elements();
        debug!(released, capacity = self.capacity(), "destroyed array");
        released
    }

    fn release_elements(&mut self) -> usize {
        let released = self.count;
        for slot in self.slots[..self.count].iter_mut() {
            drop(slot.take());
        }
        self.count = 0;
        released
    }
}

impl<T: AsRef<[u8]>> DynamicArray<T> {
    /// Remove the first element whose bytes equal `element`
    ///
    /// The tail shifts one slot left. When nothing matches the array is left
    /// unchanged and `NotFound` is returned.
    pub fn remove<Q>(&mut self, element: &Q) -> Result<T>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let needle = element.as_ref();
        let position = self.slots[..self.count]
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|v| v.as_ref() == needle));

        let Some(found) = position else {
            return Err(DynarrError::NotFound(BString::from(needle)));
        };

        let removed = self.slots[found].take();
        for i in found..self.count - 1 {
            self.slots[i] = self.slots[i + 1].take();
        }
        self.count -= 1;

        trace!(index = found, count = self.count, "removed element");
        removed.ok_or_else(|| DynarrError::NotFound(BString::from(needle)))
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        self.release_elements();
    }
}

/// Renders as `[a,b,c]`
impl<T: AsRef<[u8]>> fmt::Display for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.slots[..self.count].iter().flatten().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", BStr::new(value))?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn contents(arr: &DynamicArray) -> Vec<String> {
        (0..arr.len())
            .map(|i| arr.read(i).unwrap().to_string())
            .collect()
    }

    /// Element that counts how often it is released
    struct Tracked {
        text: &'static str,
        drops: Arc<AtomicUsize>,
    }

    impl AsRef<[u8]> for Tracked {
        fn as_ref(&self) -> &[u8] {
            self.text.as_bytes()
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_create_rejects_zero() {
        let err = DynamicArray::<BString>::create(0).unwrap_err();
        assert!(matches!(err, DynarrError::InvalidArgument(_)));
    }

    #[test]
    fn test_create_rejects_oversize() {
        let err = DynamicArray::<BString>::create(usize::MAX / 8).unwrap_err();
        assert!(matches!(err, DynarrError::InvalidArgument(_)));
        let err = DynamicArray::<BString>::create(usize::MAX).unwrap_err();
        assert!(matches!(err, DynarrError::InvalidArgument(_)));
    }

    #[test]
    fn test_create_unallocatable_is_error() {
        // Within the layout limit but far beyond any address space
        let capacity = DynamicArray::<BString>::MAX_CAPACITY;
        let err = DynamicArray::<BString>::create(capacity).unwrap_err();
        assert!(matches!(err, DynarrError::InvalidArgument(_)));
    }

    #[test]
    fn test_next_capacity_stops_at_max() {
        let max = DynamicArray::<BString>::MAX_CAPACITY;
        assert_eq!(DynamicArray::<BString>::next_capacity(1), Some(2));
        assert_eq!(DynamicArray::<BString>::next_capacity(3), Some(6));
        assert_eq!(DynamicArray::<BString>::next_capacity(max / 2), Some(max / 2 * 2));
        assert_eq!(DynamicArray::<BString>::next_capacity(max / 2 + 1), None);
        assert_eq!(DynamicArray::<BString>::next_capacity(usize::MAX), None);
    }

    #[test]
    fn test_create_empty() {
        let arr: DynamicArray = DynamicArray::create(3).unwrap();
        assert_eq!(arr.len(), 0);
        assert!(arr.is_empty());
        assert_eq!(arr.capacity(), 3);
        assert_eq!(arr.to_string(), "[]");
    }

    #[test]
    fn test_insert_shifts_right() {
        let mut arr: DynamicArray = DynamicArray::create(4).unwrap();
        arr.append("a").unwrap();
        arr.append("c").unwrap();
        arr.insert(1, "b").unwrap();
        arr.insert(0, "z").unwrap();
        assert_eq!(contents(&arr), vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn test_insert_at_count_appends() {
        let mut arr: DynamicArray = DynamicArray::create(1).unwrap();
        arr.insert(0, "a").unwrap();
        arr.insert(1, "b").unwrap();
        assert_eq!(contents(&arr), vec!["a", "b"]);
    }

    #[test]
    fn test_insert_past_end_fails_unchanged() {
        let mut arr: DynamicArray = DynamicArray::create(1).unwrap();
        arr.append("a").unwrap();
        let err = arr.insert(2, "x").unwrap_err();
        assert!(matches!(
            err,
            DynarrError::IndexOutOfRange { index: 2, count: 1 }
        ));
        assert_eq!(contents(&arr), vec!["a"]);
        assert_eq!(arr.capacity(), 1);
    }

    #[test]
    fn test_read_at_count_fails() {
        let mut arr: DynamicArray = DynamicArray::create(2).unwrap();
        arr.append("a").unwrap();
        assert!(arr.read(0).is_ok());
        assert!(matches!(
            arr.read(1),
            Err(DynarrError::IndexOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_append_grows_when_full() {
        let mut arr: DynamicArray = DynamicArray::create(1).unwrap();
        arr.append("a").unwrap();
        assert_eq!(arr.capacity(), 1);
        arr.append("b").unwrap();
        assert_eq!(arr.capacity(), 2);
        arr.append("c").unwrap();
        assert_eq!(arr.capacity(), 4);
        assert_eq!(contents(&arr), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_grow_moves_handles_only() {
        let mut arr: DynamicArray = DynamicArray::create(2).unwrap();
        arr.append("a").unwrap();
        arr.append("b").unwrap();
        arr.grow().unwrap();
        assert_eq!(arr.capacity(), 4);
        assert_eq!(arr.handles_moved(), 2);
        assert_eq!(contents(&arr), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_shifts_left() {
        let mut arr: DynamicArray = DynamicArray::create(4).unwrap();
        for s in ["a", "b", "c", "d"] {
            arr.append(s).unwrap();
        }
        let removed = arr.remove("b").unwrap();
        assert_eq!(removed, "b");
        assert_eq!(contents(&arr), vec!["a", "c", "d"]);
        assert_eq!(arr.capacity(), 4);
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut arr: DynamicArray = DynamicArray::create(4).unwrap();
        for s in ["x", "y", "x"] {
            arr.append(s).unwrap();
        }
        arr.remove("x").unwrap();
        assert_eq!(contents(&arr), vec!["y", "x"]);
    }

    #[test]
    fn test_remove_last_element() {
        let mut arr: DynamicArray = DynamicArray::create(2).unwrap();
        arr.append("a").unwrap();
        arr.append("b").unwrap();
        arr.remove("b").unwrap();
        assert_eq!(contents(&arr), vec!["a"]);
    }

    #[test]
    fn test_remove_missing_leaves_count() {
        let mut arr: DynamicArray = DynamicArray::create(2).unwrap();
        arr.append("a").unwrap();
        let err = arr.remove("q").unwrap_err();
        assert!(matches!(err, DynarrError::NotFound(ref v) if v == "q"));
        assert_eq!(arr.len(), 1);
        assert_eq!(contents(&arr), vec!["a"]);
    }

    #[test]
    fn test_display_format() {
        let mut arr: DynamicArray = DynamicArray::create(1).unwrap();
        arr.append("one").unwrap();
        assert_eq!(arr.to_string(), "[one]");
        arr.append("two").unwrap();
        assert_eq!(arr.to_string(), "[one,two]");
    }

    #[test]
    fn test_destroy_releases_each_element_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut arr: DynamicArray<Tracked> = DynamicArray::create(1).unwrap();
        for text in ["a", "b", "c"] {
            arr.append(Tracked {
                text,
                drops: drops.clone(),
            }).unwrap();
        }
        assert_eq!(drops.load(Ordering::SeqCst), 0);
        assert_eq!(arr.destroy(), 3);
        assert_eq!(drops.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_scope_exit_releases_elements() {
        let drops = Arc::new(AtomicUsize::new(0));
        {
            let mut arr: DynamicArray<Tracked> = DynamicArray::create(2).unwrap();
            for text in ["a", "b", "c", "d", "e"] {
                arr.append(Tracked {
                    text,
                    drops: drops.clone(),
                }).unwrap();
            }
            // Growth must not release anything
            assert_eq!(drops.load(Ordering::SeqCst), 0);
            drop(arr.remove("c").unwrap());
            assert_eq!(drops.load(Ordering::SeqCst), 1);
        }
        assert_eq!(drops.load(Ordering::SeqCst), 5);
    }
}

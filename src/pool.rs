//! [`Pool`] implementation.

use std::{
    iter::Enumerate,
    ops::{Index, IndexMut},
};

use crate::NodeId;

/// Slot of a [`Pool`].
#[derive(Clone)]
pub(crate) enum PoolItem<T> {
    Filled(T),
    Empty,
}

impl<T> From<T> for PoolItem<T> {
    fn from(item: T) -> Self {
        PoolItem::Filled(item)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PoolItem<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolItem::Filled(item) => write!(f, "Filled({:?})", item),
            PoolItem::Empty => write!(f, "Empty"),
        }
    }
}

/// [`Pool`] data structure.
///
/// Flat arena addressed by [`NodeId`].
/// Removed slots are remembered and reused by the next insertion,
/// so ids of live items never move.
#[derive(Clone)]
pub struct Pool<T> {
    pub(crate) vec: Vec<PoolItem<T>>,
    pub(crate) garbage: Vec<usize>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Pool {
            vec: Default::default(),
            garbage: Default::default(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("vec", &self.vec)
            .field("garbage", &self.garbage)
            .finish()
    }
}

/// Indexing a [`pool`](Pool) with [`NodeId`]
///
/// ```ignore
/// let node = &tree.nodes()[NodeId(0)];
/// ```
impl<T> Index<NodeId> for Pool<T> {
    type Output = T;

    fn index(&self, index: NodeId) -> &Self::Output {
        match self.vec.get(usize::from(index)) {
            Some(PoolItem::Filled(item)) => item,
            _ => unreachable!("Indexing garbage slot: {index}"),
        }
    }
}

/// Mutable Indexing a [`pool`](Pool) with [`NodeId`]
impl<T> IndexMut<NodeId> for Pool<T> {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        match self.vec.get_mut(usize::from(index)) {
            Some(PoolItem::Filled(item)) => item,
            _ => unreachable!("Mut Indexing garbage slot: {index}"),
        }
    }
}

impl<T> Pool<T> {
    #[inline(always)]
    pub(crate) fn insert(&mut self, t: T) -> NodeId {
        if let Some(idx) = self.garbage.pop() {
            self.vec[idx] = PoolItem::Filled(t);
            idx.into()
        } else {
            self.vec.push(PoolItem::Filled(t));
            (self.vec.len() - 1).into()
        }
    }

    #[inline(always)]
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
        let index: usize = id.into();
        let slot = self.vec.get_mut(index)?;
        match std::mem::replace(slot, PoolItem::Empty) {
            PoolItem::Filled(item) => {
                self.garbage.push(index);
                Some(item)
            }
            PoolItem::Empty => None,
        }
    }

    #[inline(always)]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.vec.get(usize::from(id)) {
            Some(PoolItem::Filled(item)) => Some(item),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn is_garbage(&self, id: NodeId) -> bool {
        self.get(id).is_none()
    }

    /// Returns the number of live items.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.vec.len() - self.garbage_len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of free slots waiting for reuse.
    #[inline(always)]
    pub fn garbage_len(&self) -> usize {
        self.garbage.len()
    }

    /// Iterates over live items together with their ids.
    ///
    /// Free slots are skipped.
    pub fn iter(&self) -> PoolIterator<T> {
        PoolIterator::new(self)
    }
}

/// Iterator for a [`Pool`].
///
/// Yields only live items with their [`NodeId`].
#[derive(Clone)]
pub struct PoolIterator<'pool, T> {
    inner: Enumerate<std::slice::Iter<'pool, PoolItem<T>>>,
    garbage_len: usize,
}

impl<'pool, T> PoolIterator<'pool, T> {
    fn new(pool: &'pool Pool<T>) -> Self {
        PoolIterator {
            inner: pool.vec.iter().enumerate(),
            garbage_len: pool.garbage_len(),
        }
    }
}

impl<'pool, T> Iterator for PoolIterator<'pool, T> {
    type Item = (NodeId, &'pool T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (idx, item) = self.inner.next()?;
            if let PoolItem::Filled(item) = item {
                return Some((idx.into(), item));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let hint = self.inner.size_hint();
        (
            hint.0.saturating_sub(self.garbage_len),
            hint.1,
        )
    }
}

impl<T> std::iter::FusedIterator for PoolIterator<'_, T> {}

//! Fixed-capacity block registry
//!
//! Blocks are addressed by monotonically increasing handles that are never
//! reused, even when their slot is. Each slot records the handle that owns
//! it, and lookups check that owner after locking the slot, so a handle
//! destroyed between lookup and lock never reaches the slot's next block.
//! Insert/remove take the metadata write lock; processing only locks the one
//! slot it touches, so different blocks can run on different scheduler
//! threads at once.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, RwLock};

use crate::error::{BlockError, Result};

struct Slot<T> {
    /// Owning handle and block
    data: Mutex<Option<(u64, T)>>,
}

struct SlabMeta {
    /// Indices of empty slots
    free: Vec<usize>,
    next_id: u64,
    id_to_slot: HashMap<u64, usize>,
}

pub struct BlockSlab<T> {
    slots: Vec<Slot<T>>,
    meta: RwLock<SlabMeta>,
}

impl<T> BlockSlab<T> {
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| Slot { data: Mutex::new(None) }).collect();
        Self {
            slots,
            meta: RwLock::new(SlabMeta {
                free: (0..capacity).rev().collect(),
                next_id: 0,
                id_to_slot: HashMap::new(),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Store a block and return its handle.
    pub fn insert(&self, item: T) -> Result<u64> {
        let mut meta = self.meta.write().unwrap_or_else(|e| e.into_inner());
        let slot_idx = meta.free.pop().ok_or(BlockError::RegistryFull {
            capacity: self.capacity(),
        })?;

        let id = meta.next_id;
        meta.next_id += 1;
        *self.lock_slot(slot_idx) = Some((id, item));
        meta.id_to_slot.insert(id, slot_idx);
        Ok(id)
    }

    fn slot_idx(&self, id: u64) -> Result<usize> {
        let meta = self.meta.read().unwrap_or_else(|e| e.into_inner());
        meta.id_to_slot.get(&id).copied().ok_or(BlockError::NotFound(id))
    }

    fn lock_slot(&self, idx: usize) -> MutexGuard<'_, Option<(u64, T)>> {
        // A panic inside a block callback must not brick the slot
        self.slots[idx].data.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Lock slot `idx` only if `id` still owns it.
    fn lock_owned(&self, idx: usize, id: u64) -> Result<MutexGuard<'_, Option<(u64, T)>>> {
        let guard = self.lock_slot(idx);
        let owned = matches!(guard.as_ref(), Some((owner, _)) if *owner == id);
        if owned {
            Ok(guard)
        } else {
            Err(BlockError::NotFound(id))
        }
    }

    /// Run `f` with exclusive access to one block.
    pub fn with_block_mut<F, R>(&self, id: u64, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let idx = self.slot_idx(id)?;
        let mut guard = self.lock_owned(idx, id)?;
        let (_, block) = guard.as_mut().ok_or(BlockError::NotFound(id))?;
        Ok(f(block))
    }

    pub fn with_block<F, R>(&self, id: u64, f: F) -> Result<R>
    where
        F: FnOnce(&T) -> R,
    {
        let idx = self.slot_idx(id)?;
        let guard = self.lock_owned(idx, id)?;
        let (_, block) = guard.as_ref().ok_or(BlockError::NotFound(id))?;
        Ok(f(block))
    }

    /// Take a block out of the registry and free its slot.
    pub fn remove(&self, id: u64) -> Result<T> {
        let mut meta = self.meta.write().unwrap_or_else(|e| e.into_inner());
        let idx = meta.id_to_slot.get(&id).copied().ok_or(BlockError::NotFound(id))?;
        let item = self.lock_owned(idx, id)?.take();
        meta.id_to_slot.remove(&id);
        meta.free.push(idx);
        item.map(|(_, block)| block).ok_or(BlockError::NotFound(id))
    }

    pub fn count(&self) -> usize {
        let meta = self.meta.read().unwrap_or_else(|e| e.into_inner());
        meta.id_to_slot.len()
    }
}

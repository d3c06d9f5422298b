//! Macro storage.
//!
//! An open-addressing string→string map with linear probing and tombstone
//! deletion. Named text blocks captured during scanning (`@name` + indented
//! body) are registered here keyed by macro name. Inserting an existing key
//! overwrites its value.

/// Max load before the table resizes.
const MAX_LOAD_NUM: usize = 3;
const MAX_LOAD_DEN: usize = 4;

/// Smallest non-zero capacity. Capacity is always a power of two so the
/// probe index can be masked instead of taking a modulo.
const MIN_CAPACITY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Empty,
    // Deleted entry; keeps probe chains over it valid
    Tombstone,
    Live { key: String, value: String },
}

/// String-keyed table of captured macro bodies.
///
/// `count` tracks live entries plus tombstones — it drives the load factor,
/// so a slot burned by a deletion still counts toward a resize. Rehashing
/// drops tombstones and recomputes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroTable {
    count: usize,
    slots: Vec<Slot>,
}

/// 32-bit FNV-1a over the key's bytes.
fn hash_key(key: &str) -> u32 {
    let mut hash: u32 = 2166136261;
    for byte in key.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16777619);
    }
    hash
}

/// Probe for `key` starting at its hash slot. Returns the index of the live
/// entry if present, otherwise the first tombstone passed on the way (so
/// inserts reuse dead slots), otherwise the empty slot that ends the chain.
fn find_slot(slots: &[Slot], key: &str) -> usize {
    let mask = slots.len() - 1;
    let mut index = hash_key(key) as usize & mask;
    let mut tombstone = None;

    loop {
        match &slots[index] {
            Slot::Empty => return tombstone.unwrap_or(index),
            Slot::Tombstone => {
                if tombstone.is_none() {
                    tombstone = Some(index);
                }
            }
            Slot::Live { key: k, .. } if k == key => return index,
            Slot::Live { .. } => {}
        }
        index = (index + 1) & mask;
    }
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the body stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.count == 0 {
            return None;
        }
        match &self.slots[find_slot(&self.slots, key)] {
            Slot::Live { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Insert or overwrite `key`. Returns `true` when the key was not
    /// already live in the table.
    pub fn set(&mut self, key: String, value: String) -> bool {
        if self.count + 1 > self.slots.len() * MAX_LOAD_NUM / MAX_LOAD_DEN {
            self.grow();
        }

        let index = find_slot(&self.slots, &key);
        let is_new = !matches!(self.slots[index], Slot::Live { .. });
        // Reusing a tombstone does not raise the load
        if self.slots[index] == Slot::Empty {
            self.count += 1;
        }
        self.slots[index] = Slot::Live { key, value };
        is_new
    }

    /// Remove `key`, leaving a tombstone so probe chains stay intact.
    /// Returns `true` when the key was present.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.count == 0 {
            return false;
        }
        let index = find_slot(&self.slots, key);
        if !matches!(self.slots[index], Slot::Live { .. }) {
            return false;
        }
        self.slots[index] = Slot::Tombstone;
        true
    }

    /// Copy every live entry of `other` into this table, overwriting
    /// entries that share a key.
    pub fn merge_from(&mut self, other: &MacroTable) {
        for slot in &other.slots {
            if let Slot::Live { key, value } = slot {
                self.set(key.clone(), value.clone());
            }
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Live { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Double the slot array (minimum 8) and rehash every live entry.
    /// Tombstones are dropped and `count` recomputed.
    fn grow(&mut self) {
        let capacity = if self.slots.len() < MIN_CAPACITY {
            MIN_CAPACITY
        } else {
            self.slots.len() * 2
        };

        let mut slots = vec![Slot::Empty; capacity];
        self.count = 0;
        for slot in std::mem::take(&mut self.slots) {
            if let Slot::Live { key, value } = slot {
                let index = find_slot(&slots, &key);
                slots[index] = Slot::Live { key, value };
                self.count += 1;
            }
        }
        self.slots = slots;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Basic get/set
    // =========================================================================

    #[test]
    fn test_empty_table_get() {
        let table = MacroTable::new();
        assert_eq!(table.get("missing"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let mut table = MacroTable::new();
        assert!(table.set("greeting".into(), "h1 \"Hi\"".into()));
        assert_eq!(table.get("greeting"), Some("h1 \"Hi\""));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_get_missing_key() {
        let mut table = MacroTable::new();
        table.set("a".into(), "1".into());
        assert_eq!(table.get("b"), None);
    }

    #[test]
    fn test_set_existing_key_overwrites() {
        let mut table = MacroTable::new();
        assert!(table.set("a".into(), "first".into()));
        assert!(!table.set("a".into(), "second".into()));
        assert_eq!(table.get("a"), Some("second"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_string_value() {
        let mut table = MacroTable::new();
        table.set("blank".into(), String::new());
        assert_eq!(table.get("blank"), Some(""));
    }

    // =========================================================================
    // Deletion and tombstones
    // =========================================================================

    #[test]
    fn test_delete_then_get() {
        let mut table = MacroTable::new();
        table.set("a".into(), "1".into());
        assert!(table.delete("a"));
        assert_eq!(table.get("a"), None);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_delete_missing_key() {
        let mut table = MacroTable::new();
        table.set("a".into(), "1".into());
        assert!(!table.delete("b"));
    }

    #[test]
    fn test_delete_on_empty_table() {
        let mut table = MacroTable::new();
        assert!(!table.delete("a"));
    }

    #[test]
    fn test_delete_preserves_other_entries() {
        let mut table = MacroTable::new();
        for i in 0..12 {
            table.set(format!("key{i}"), format!("value{i}"));
        }
        assert!(table.delete("key5"));
        for i in 0..12 {
            if i == 5 {
                assert_eq!(table.get("key5"), None);
            } else {
                assert_eq!(table.get(&format!("key{i}")), Some(format!("value{i}").as_str()));
            }
        }
    }

    #[test]
    fn test_reinsert_after_delete() {
        let mut table = MacroTable::new();
        table.set("a".into(), "1".into());
        table.delete("a");
        assert!(table.set("a".into(), "2".into()));
        assert_eq!(table.get("a"), Some("2"));
    }

    // =========================================================================
    // Resizing
    // =========================================================================

    #[test]
    fn test_first_insert_allocates_minimum_capacity() {
        let mut table = MacroTable::new();
        assert_eq!(table.capacity(), 0);
        table.set("a".into(), "1".into());
        assert_eq!(table.capacity(), 8);
    }

    #[test]
    fn test_resize_preserves_entries() {
        let mut table = MacroTable::new();
        for i in 0..50 {
            table.set(format!("macro{i}"), format!("body{i}"));
        }
        assert_eq!(table.len(), 50);
        assert!(table.capacity() >= 64);
        for i in 0..50 {
            assert_eq!(table.get(&format!("macro{i}")), Some(format!("body{i}").as_str()));
        }
    }

    #[test]
    fn test_resize_triggers_past_load_factor() {
        let mut table = MacroTable::new();
        // 6 entries fit in capacity 8 at 75% load; the 7th doubles it
        for i in 0..6 {
            table.set(format!("k{i}"), "v".into());
        }
        assert_eq!(table.capacity(), 8);
        table.set("k6".into(), "v".into());
        assert_eq!(table.capacity(), 16);
    }

    #[test]
    fn test_resize_drops_tombstones() {
        let mut table = MacroTable::new();
        for i in 0..6 {
            table.set(format!("k{i}"), "v".into());
        }
        for i in 0..6 {
            table.delete(&format!("k{i}"));
        }
        // Tombstones still count toward load; this insert forces a rehash
        // that sweeps them out
        table.set("fresh".into(), "v".into());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("fresh"), Some("v"));
    }

    // =========================================================================
    // merge_from
    // =========================================================================

    #[test]
    fn test_merge_from_copies_entries() {
        let mut from = MacroTable::new();
        from.set("a".into(), "1".into());
        from.set("b".into(), "2".into());

        let mut to = MacroTable::new();
        to.set("c".into(), "3".into());
        to.merge_from(&from);

        assert_eq!(to.len(), 3);
        assert_eq!(to.get("a"), Some("1"));
        assert_eq!(to.get("b"), Some("2"));
        assert_eq!(to.get("c"), Some("3"));
    }

    #[test]
    fn test_merge_from_overwrites_shared_keys() {
        let mut from = MacroTable::new();
        from.set("a".into(), "theirs".into());

        let mut to = MacroTable::new();
        to.set("a".into(), "ours".into());
        to.merge_from(&from);

        assert_eq!(to.get("a"), Some("theirs"));
    }

    #[test]
    fn test_merge_from_empty() {
        let from = MacroTable::new();
        let mut to = MacroTable::new();
        to.set("a".into(), "1".into());
        to.merge_from(&from);
        assert_eq!(to.len(), 1);
    }
}

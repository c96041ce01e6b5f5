//! Grouping sort engine
//!
//! Records are grouped by key in an ordered map. Every group keeps its
//! records in arrival order, so the output is a stable sort: records with
//! equal keys come out in the order they went in, whatever the direction.

use crate::fields::Key;
use std::collections::BTreeMap;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    /// Groups are emitted from the largest key down; records inside a group
    /// keep their arrival order.
    Descending,
}

/// In-memory multi-key grouping sort over captured records
#[derive(Debug)]
pub struct GroupingSort<K> {
    groups: BTreeMap<Key<K>, Vec<Vec<u8>>>,
    records: usize,
}

impl<K: Ord> GroupingSort<K> {
    pub fn new() -> Self {
        GroupingSort {
            groups: BTreeMap::new(),
            records: 0,
        }
    }

    pub fn push(&mut self, key: Key<K>, capture: Vec<u8>) {
        self.groups.entry(key).or_default().push(capture);
        self.records += 1;
    }

    /// Number of records pushed
    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Number of distinct keys
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Writes every record in key order, flushing after each one when `flush`
    /// is set.
    pub fn write_to<W: Write>(&self, writer: &mut W, order: SortOrder, flush: bool) -> io::Result<()> {
        let groups: Box<dyn Iterator<Item = &Vec<Vec<u8>>>> = match order {
            SortOrder::Ascending => Box::new(self.groups.values()),
            SortOrder::Descending => Box::new(self.groups.values().rev()),
        };
        for capture in groups.flatten() {
            writer.write_all(capture)?;
            if flush {
                writer.flush()?;
            }
        }
        writer.flush()
    }
}

impl<K: Ord> Default for GroupingSort<K> {
    fn default() -> Self {
        Self::new()
    }
}

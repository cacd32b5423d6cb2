use super::transaction::AggregatedTransaction;
use std::collections::HashMap;
use std::collections::hash_map;
use std::slice;

/// Per-category rollups in either of the two shapes the pipelines produce.
///
/// Sequential aggregation yields a list, the fan-in merge yields a map keyed by
/// category. Consumers iterate both the same way through [`AggregateSet::iter`].
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateSet {
    Slice(Vec<AggregatedTransaction>),
    Map(HashMap<String, AggregatedTransaction>),
}

impl AggregateSet {
    pub fn iter(&self) -> AggregateIter<'_> {
        match self {
            AggregateSet::Slice(items) => AggregateIter::Slice(items.iter()),
            AggregateSet::Map(items) => AggregateIter::Map(items.values()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AggregateSet::Slice(items) => items.len(),
            AggregateSet::Map(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<AggregatedTransaction>> for AggregateSet {
    fn from(items: Vec<AggregatedTransaction>) -> Self {
        AggregateSet::Slice(items)
    }
}

impl From<HashMap<String, AggregatedTransaction>> for AggregateSet {
    fn from(items: HashMap<String, AggregatedTransaction>) -> Self {
        AggregateSet::Map(items)
    }
}

/// Borrowing iterator over an [`AggregateSet`], whatever its backing shape.
pub enum AggregateIter<'a> {
    Slice(slice::Iter<'a, AggregatedTransaction>),
    Map(hash_map::Values<'a, String, AggregatedTransaction>),
}

impl<'a> Iterator for AggregateIter<'a> {
    type Item = &'a AggregatedTransaction;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            AggregateIter::Slice(iter) => iter.next(),
            AggregateIter::Map(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            AggregateIter::Slice(iter) => iter.size_hint(),
            AggregateIter::Map(iter) => iter.size_hint(),
        }
    }
}

impl<'a> IntoIterator for &'a AggregateSet {
    type Item = &'a AggregatedTransaction;
    type IntoIter = AggregateIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

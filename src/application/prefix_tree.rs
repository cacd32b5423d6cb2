use crate::domain::transaction::Transaction;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Node {
    children: BTreeMap<u8, Node>,
    /// Transactions whose product name ends exactly at this node.
    transactions: Vec<Transaction>,
}

// A long name is a long chain of single-child nodes; tear it down with an
// explicit stack instead of recursing once per byte.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending: Vec<Node> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

/// Trie over product names, one edge per byte.
///
/// Building costs one pass over every name; a query then only walks the prefix
/// and the subtree below it, so repeated lookups against the same dataset do
/// not rescan the records that cannot match.
#[derive(Debug, Default)]
pub struct PrefixTree {
    root: Node,
    len: usize,
}

impl PrefixTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes a copy of every transaction in `transactions`.
    pub fn build(transactions: &[Transaction]) -> Self {
        transactions.iter().cloned().collect()
    }

    pub fn insert(&mut self, tx: Transaction) {
        let mut node = &mut self.root;
        for byte in tx.product_name.bytes() {
            node = node.children.entry(byte).or_default();
        }
        node.transactions.push(tx);
        self.len += 1;
    }

    /// Number of indexed transactions.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn find(&self, prefix: &str) -> Option<&Node> {
        let mut node = &self.root;
        for byte in prefix.bytes() {
            node = node.children.get(&byte)?;
        }
        Some(node)
    }

    /// Borrows every transaction whose product name starts with `prefix`.
    ///
    /// Groups come out in byte order of the names, and each group keeps
    /// insertion order.
    pub fn matches(&self, prefix: &str) -> Vec<&Transaction> {
        let Some(start) = self.find(prefix) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            found.extend(node.transactions.iter());
            // reversed so that the smallest byte is visited first
            stack.extend(node.children.values().rev());
        }
        found
    }

    /// Owned copies of [`PrefixTree::matches`].
    pub fn query(&self, prefix: &str) -> Vec<Transaction> {
        self.matches(prefix).into_iter().cloned().collect()
    }
}

impl FromIterator<Transaction> for PrefixTree {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        let mut tree = PrefixTree::new();
        for tx in iter {
            tree.insert(tx);
        }
        tree
    }
}

/// Filters through a freshly built tree; the tree is dropped afterwards.
pub fn filter_by_prefix_tree(transactions: &[Transaction], prefix: &str) -> Vec<Transaction> {
    PrefixTree::build(transactions).query(prefix)
}

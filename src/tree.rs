// 🌳 Budget Tree - Ministry → Program → Activity → Subitem
//
// Every node carries one bucket per account category and a grand total.
// Totals are stored redundantly at every level (never summed from children
// at read time). Activity and Subitem buckets also keep a detail list;
// Ministry and Program buckets only keep the total.

use crate::category::AccountCategory;
use crate::finalize::compare_names;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::Debug;

// ============================================================================
// AMOUNTS
// ============================================================================

/// Largest integer an f64 holds exactly
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Amount as written to JSON: whole numbers without a trailing ".0"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount(pub f64);

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT_INT {
            serializer.serialize_i64(value as i64)
        } else {
            serializer.serialize_f64(value)
        }
    }
}

fn serialize_amount<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    Amount(*value).serialize(serializer)
}

// ============================================================================
// BUCKETS
// ============================================================================

/// A named sub-amount under a category bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detail {
    pub name: String,
    #[serde(serialize_with = "serialize_amount")]
    pub total: f64,
}

/// Per-category accumulator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    /// Present only on levels that track details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Detail>>,

    #[serde(serialize_with = "serialize_amount")]
    pub total: f64,
}

impl Bucket {
    pub fn new(track_details: bool) -> Self {
        Bucket {
            details: if track_details { Some(Vec::new()) } else { None },
            total: 0.0,
        }
    }

    pub fn tracks_details(&self) -> bool {
        self.details.is_some()
    }
}

/// The eight category buckets of one node
#[derive(Debug, Clone, PartialEq)]
pub struct Accounts {
    buckets: [Bucket; 8],
}

impl Accounts {
    pub fn new(track_details: bool) -> Self {
        Accounts {
            buckets: std::array::from_fn(|_| Bucket::new(track_details)),
        }
    }

    pub fn get(&self, category: AccountCategory) -> &Bucket {
        &self.buckets[category.index()]
    }

    pub fn get_mut(&mut self, category: AccountCategory) -> &mut Bucket {
        &mut self.buckets[category.index()]
    }

    /// Buckets in output order
    pub fn iter(&self) -> impl Iterator<Item = (AccountCategory, &Bucket)> {
        AccountCategory::ALL.iter().copied().zip(self.buckets.iter())
    }

    /// Sum of the eight bucket totals
    pub fn sum(&self) -> f64 {
        self.buckets.iter().map(|b| b.total).sum()
    }
}

// ============================================================================
// LEVELS
// ============================================================================

/// Behaviour shared by every node kind
pub trait TreeNode: Serialize + Debug + Clone + PartialEq {
    fn name(&self) -> &str;

    /// Sort children by name, recursively
    fn sort_recursive(&mut self);
}

/// Node kinds that can be created lazily by name
pub trait Spawn: TreeNode {
    fn spawn(name: &str) -> Self;
}

/// Static description of one hierarchy level
pub trait Level: Debug + Clone + PartialEq {
    type Child: TreeNode;

    /// JSON key of the child array, None for leaves
    const CHILDREN_KEY: Option<&'static str>;

    /// Whether buckets at this level keep a detail list
    const TRACKS_DETAILS: bool;

    /// For logs
    const LABEL: &'static str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinistryLevel;

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramLevel;

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityLevel;

#[derive(Debug, Clone, PartialEq)]
pub struct SubitemLevel;

impl Level for MinistryLevel {
    type Child = Program;
    const CHILDREN_KEY: Option<&'static str> = Some("programs");
    const TRACKS_DETAILS: bool = false;
    const LABEL: &'static str = "ministry";
}

impl Level for ProgramLevel {
    type Child = Activity;
    const CHILDREN_KEY: Option<&'static str> = Some("activities");
    const TRACKS_DETAILS: bool = false;
    const LABEL: &'static str = "program";
}

impl Level for ActivityLevel {
    type Child = Subitem;
    const CHILDREN_KEY: Option<&'static str> = Some("subitems");
    const TRACKS_DETAILS: bool = true;
    const LABEL: &'static str = "activity";
}

impl Level for SubitemLevel {
    type Child = Leaf;
    const CHILDREN_KEY: Option<&'static str> = None;
    const TRACKS_DETAILS: bool = true;
    const LABEL: &'static str = "subitem";
}

/// Child type of a subitem: uninhabited
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {}

impl Serialize for Leaf {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        match *self {}
    }
}

impl TreeNode for Leaf {
    fn name(&self) -> &str {
        match *self {}
    }

    fn sort_recursive(&mut self) {
        match *self {}
    }
}

// ============================================================================
// SIBLINGS
// ============================================================================

/// Ordered child collection with unique names
///
/// Insertion order is kept until `sort_by_name`. The name index is only an
/// accelerator for lookups and never affects ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Siblings<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Siblings<T> {
    fn default() -> Self {
        Siblings {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: TreeNode> Siblings<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut T> {
        self.items.get_mut(position)
    }

    /// Exact-name lookup
    pub fn find(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.items[i])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Find the child named `name`, appending a fresh one if absent.
    /// Returns its position and whether it was created.
    pub fn resolve(&mut self, name: &str) -> (usize, bool)
    where
        T: Spawn,
    {
        if let Some(&position) = self.index.get(name) {
            return (position, false);
        }

        let position = self.items.len();
        self.items.push(T::spawn(name));
        self.index.insert(name.to_string(), position);
        (position, true)
    }

    /// Sort this collection (not the children's children) by name
    pub fn sort_by_name(&mut self) {
        self.items.sort_by(|a, b| compare_names(a.name(), b.name()));
        self.reindex();
    }

    /// Sort this collection and every collection below it
    pub fn sort_recursive(&mut self) {
        for item in self.items.iter_mut() {
            item.sort_recursive();
        }
        self.sort_by_name();
    }

    fn reindex(&mut self) {
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name().to_string(), i))
            .collect();
    }
}

impl<T> std::ops::Index<usize> for Siblings<T> {
    type Output = T;

    fn index(&self, position: usize) -> &T {
        &self.items[position]
    }
}

impl<T> std::ops::IndexMut<usize> for Siblings<T> {
    fn index_mut(&mut self, position: usize) -> &mut T {
        &mut self.items[position]
    }
}

impl<T: Serialize> Serialize for Siblings<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

// ============================================================================
// NODE
// ============================================================================

/// One named node of the hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct Node<L: Level> {
    pub name: String,
    pub accounts: Accounts,
    pub total: f64,
    pub children: Siblings<L::Child>,
}

pub type Ministry = Node<MinistryLevel>;
pub type Program = Node<ProgramLevel>;
pub type Activity = Node<ActivityLevel>;
pub type Subitem = Node<SubitemLevel>;

impl<L: Level> Node<L> {
    /// Zero-initialised node
    pub fn new(name: &str) -> Self {
        Node {
            name: name.to_string(),
            accounts: Accounts::new(L::TRACKS_DETAILS),
            total: 0.0,
            children: Siblings::default(),
        }
    }

    pub fn bucket(&self, category: AccountCategory) -> &Bucket {
        self.accounts.get(category)
    }
}

impl<L: Level> TreeNode for Node<L> {
    fn name(&self) -> &str {
        &self.name
    }

    fn sort_recursive(&mut self) {
        self.children.sort_recursive();
    }
}

impl<L: Level> Spawn for Node<L> {
    fn spawn(name: &str) -> Self {
        Node::new(name)
    }
}

// Key order: name, children, eight categories, total
impl<L: Level> Serialize for Node<L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        if let Some(key) = L::CHILDREN_KEY {
            map.serialize_entry(key, &self.children)?;
        }
        for (category, bucket) in self.accounts.iter() {
            map.serialize_entry(category.key(), bucket)?;
        }
        map.serialize_entry("total", &Amount(self.total))?;
        map.end()
    }
}

// ============================================================================
// ROOT
// ============================================================================

/// The whole aggregated ledger: a list of ministries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetTree {
    pub ministries: Siblings<Ministry>,
}

/// Number of nodes per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeCounts {
    pub ministries: usize,
    pub programs: usize,
    pub activities: usize,
    pub subitems: usize,
}

impl BudgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ministries.is_empty()
    }

    pub fn ministry(&self, name: &str) -> Option<&Ministry> {
        self.ministries.find(name)
    }

    pub fn counts(&self) -> NodeCounts {
        let mut counts = NodeCounts {
            ministries: self.ministries.len(),
            ..NodeCounts::default()
        };

        for ministry in self.ministries.iter() {
            counts.programs += ministry.children.len();
            for program in ministry.children.iter() {
                counts.activities += program.children.len();
                for activity in program.children.iter() {
                    counts.subitems += activity.children.len();
                }
            }
        }

        counts
    }

    /// Pretty JSON (2-space indent)
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for BudgetTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ministries.serialize(serializer)
    }
}

// ============================================================================
// TESTS
// ============================================================================

// 📊 Rollup Engine - resolve the row's path, then accumulate at every level
//
// Each row walks ministry → program → activity → (subitem), creating nodes
// on first reference. The row's amount is then added independently to the
// matching category bucket of every node on that path.

use crate::category::AccountCategory;
use crate::normalize::LedgerRow;
use crate::tree::{BudgetTree, Detail, Level, Node, NodeCounts, Siblings, Spawn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

// ============================================================================
// HIERARCHY RESOLVER
// ============================================================================

/// Positions of the nodes a row touches, one per level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPath {
    pub ministry: usize,
    pub program: usize,
    pub activity: usize,
    pub subitem: Option<usize>,
}

/// Find-or-create the row's ministry, program, activity and subitem
pub fn resolve(tree: &mut BudgetTree, row: &LedgerRow) -> ResolvedPath {
    let ministry_pos = resolve_in(&mut tree.ministries, &row.ministry);
    let ministry = &mut tree.ministries[ministry_pos];

    let program_pos = resolve_in(&mut ministry.children, &row.program);
    let program = &mut ministry.children[program_pos];

    let activity_pos = resolve_in(&mut program.children, &row.activity);
    let activity = &mut program.children[activity_pos];

    let subitem_pos = row
        .subitem
        .as_deref()
        .map(|name| resolve_in(&mut activity.children, name));

    ResolvedPath {
        ministry: ministry_pos,
        program: program_pos,
        activity: activity_pos,
        subitem: subitem_pos,
    }
}

fn resolve_in<L: Level>(siblings: &mut Siblings<Node<L>>, name: &str) -> usize
where
    Node<L>: Spawn,
{
    let (position, created) = siblings.resolve(name);
    if created {
        debug!(kind = L::LABEL, name, "created node");
    }
    position
}

// ============================================================================
// ACCOUNT ACCUMULATOR
// ============================================================================

impl<L: Level> Node<L> {
    /// Add `amount` to this node's bucket for `category` and to its total.
    ///
    /// Unknown categories (None) are a no-op. A detail entry is appended only
    /// when the bucket tracks details; repeated names stay separate entries.
    /// Returns whether anything was accumulated.
    pub fn apply(
        &mut self,
        category: Option<AccountCategory>,
        amount: f64,
        detail: Option<&str>,
    ) -> bool {
        let Some(category) = category else {
            return false;
        };

        let bucket = self.accounts.get_mut(category);

        if let (Some(details), Some(name)) = (bucket.details.as_mut(), detail) {
            if !name.is_empty() {
                details.push(Detail {
                    name: name.to_string(),
                    total: amount,
                });
            }
        }

        bucket.total += amount;
        self.total += amount;
        true
    }
}

/// Apply the row at subitem (if any), activity, program and ministry
pub fn accumulate(tree: &mut BudgetTree, path: &ResolvedPath, row: &LedgerRow) -> bool {
    let detail = row.detail.as_deref();

    let ministry = &mut tree.ministries[path.ministry];
    let program = &mut ministry.children[path.program];
    let activity = &mut program.children[path.activity];

    if let Some(subitem) = path.subitem {
        activity.children[subitem].apply(row.account, row.amount, detail);
    }
    activity.apply(row.account, row.amount, detail);
    program.apply(row.account, row.amount, detail);
    ministry.apply(row.account, row.amount, detail)
}

// ============================================================================
// RUN SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollupSummary {
    pub rows_read: usize,
    pub rows_applied: usize,
    pub rows_skipped: usize,
    pub rows_zeroed: usize,
    pub unknown_account_rows: usize,
    pub ministries: usize,
    pub programs: usize,
    pub activities: usize,
    pub subitems: usize,
}

impl RollupSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} rows: {} applied, {} skipped, {} zeroed, {} unknown account | {} ministries, {} programs, {} activities, {} subitems",
            self.rows_read,
            self.rows_applied,
            self.rows_skipped,
            self.rows_zeroed,
            self.unknown_account_rows,
            self.ministries,
            self.programs,
            self.activities,
            self.subitems
        )
    }

    fn set_counts(&mut self, counts: NodeCounts) {
        self.ministries = counts.ministries;
        self.programs = counts.programs;
        self.activities = counts.activities;
        self.subitems = counts.subitems;
    }
}

// ============================================================================
// ROLLUP
// ============================================================================

/// Builds a BudgetTree one row at a time
pub struct Rollup {
    tree: BudgetTree,
    summary: RollupSummary,
    unknown_labels: HashSet<String>,
}

impl Rollup {
    pub fn new() -> Self {
        Rollup {
            tree: BudgetTree::new(),
            summary: RollupSummary::default(),
            unknown_labels: HashSet::new(),
        }
    }

    /// Resolve + accumulate one row
    pub fn apply_row(&mut self, row: &LedgerRow) -> ResolvedPath {
        let path = resolve(&mut self.tree, row);
        let accumulated = accumulate(&mut self.tree, &path, row);

        self.summary.rows_applied += 1;
        if !accumulated {
            self.summary.unknown_account_rows += 1;
            if self.unknown_labels.insert(row.account_label.clone()) {
                debug!(
                    label = %row.account_label,
                    line = row.line_number,
                    "account label outside the fixed categories, amount not accumulated"
                );
            }
        }

        path
    }

    /// Apply many rows in order
    pub fn extend<'a, I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = &'a LedgerRow>,
    {
        for row in rows {
            self.apply_row(row);
        }
    }

    /// Summary bookkeeping for rows dropped before they reach the tree
    pub fn record_skipped(&mut self) {
        self.summary.rows_skipped += 1;
    }

    pub fn record_zeroed(&mut self) {
        self.summary.rows_zeroed += 1;
    }

    pub fn record_read(&mut self, rows: usize) {
        self.summary.rows_read += rows;
    }

    pub fn tree(&self) -> &BudgetTree {
        &self.tree
    }

    /// Distinct account labels that matched no category
    pub fn unknown_labels(&self) -> impl Iterator<Item = &str> {
        self.unknown_labels.iter().map(String::as_str)
    }

    /// Hand back the (unsorted) tree and the summary
    pub fn finish(self) -> (BudgetTree, RollupSummary) {
        let mut summary = self.summary;
        summary.set_counts(self.tree.counts());
        (self.tree, summary)
    }
}

impl Default for Rollup {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

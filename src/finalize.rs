// 🔤 Tree Finalizer - sort every child collection by name
//
// Names are ordered with a root-locale style collation:
// base characters first (accents and case ignored, punctuation in collation
// order rather than code point order), then accents, then lowercase before
// uppercase, and finally code points so the order is total.

use crate::tree::{BudgetTree, TreeNode};
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// COLLATION
// ============================================================================

/// Root-collation punctuation order; it is not code point order
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Primary weight of a folded character:
/// whitespace < punctuation < other symbols < digits < letters
fn primary_weight(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        (0, 0)
    } else if let Some(rank) = PUNCTUATION_ORDER.chars().position(|p| p == c) {
        (1, rank as u32)
    } else if c.is_alphabetic() {
        (4, c as u32)
    } else if c.is_numeric() {
        (3, c as u32)
    } else {
        (2, c as u32)
    }
}

/// Accent- and case-folded key
fn primary_key(name: &str) -> Vec<(u8, u32)> {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(primary_weight)
        .collect()
}

/// Case-folded key that keeps accents
fn secondary_key(name: &str) -> Vec<char> {
    name.nfd().flat_map(char::to_lowercase).collect()
}

/// Case pattern, lowercase first
fn tertiary_key(name: &str) -> Vec<bool> {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
        .collect()
}

/// Compare two sibling names
pub fn compare_names(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| secondary_key(a).cmp(&secondary_key(b)))
        .then_with(|| tertiary_key(a).cmp(&tertiary_key(b)))
        .then_with(|| a.cmp(b))
}

// ============================================================================
// FINALIZE
// ============================================================================

/// Sort ministries, programs, activities and subitems by name.
/// Nothing but child order changes.
pub fn finalize(mut tree: BudgetTree) -> BudgetTree {
    finalize_in_place(&mut tree);
    tree
}

pub fn finalize_in_place(tree: &mut BudgetTree) {
    tree.ministries.sort_recursive();
}

fn strictly_increasing<T: TreeNode>(items: &[T]) -> bool {
    items
        .windows(2)
        .all(|w| compare_names(w[0].name(), w[1].name()) == Ordering::Less)
}

/// Whether every child collection is in strictly increasing name order
pub fn is_finalized(tree: &BudgetTree) -> bool {
    if !strictly_increasing(tree.ministries.as_slice()) {
        return false;
    }

    tree.ministries.iter().all(|ministry| {
        strictly_increasing(ministry.children.as_slice())
            && ministry.children.iter().all(|program| {
                strictly_increasing(program.children.as_slice())
                    && program
                        .children
                        .iter()
                        .all(|activity| strictly_increasing(activity.children.as_slice()))
            })
    })
}

// ============================================================================
// TESTS
// ============================================================================

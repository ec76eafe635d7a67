//! Human-expected alphabetical ordering for category names
//!
//! Follows the case rules of the default `en` collation: letters compare
//! case-insensitively first, and only when two names are equal ignoring case
//! does lowercase sort before uppercase (`apple` < `Apple` < `banana`).
//! Accented letters are not folded onto their base letter.

use std::cmp::Ordering;

/// Compare two names for sibling ordering
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    primary
        .then_with(|| case_order(a, b))
        .then_with(|| a.cmp(b))
}

// First position where the two names differ only by case decides.
fn case_order(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

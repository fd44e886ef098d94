use crate::pipeline::model::MergedRow;
use std::collections::HashSet;

/// Keeps the first row of every (store, product) pair, in input order.
/// Returns the surviving rows and the number removed.
pub fn remove_duplicates(rows: Vec<MergedRow>) -> (Vec<MergedRow>, usize) {
    let total = rows.len();
    let mut seen = HashSet::<(String, String)>::with_capacity(total);
    let kept: Vec<MergedRow> = rows
        .into_iter()
        .filter(|row| seen.insert((row.store_id.to_owned(), row.product_id.to_owned())))
        .collect();
    let removed = total - kept.len();
    (kept, removed)
}

/// Drops rows without a display name or without an image.
/// Returns the surviving rows and the number rejected.
pub fn drop_incomplete(rows: Vec<MergedRow>) -> (Vec<MergedRow>, usize) {
    let total = rows.len();
    let kept: Vec<MergedRow> = rows.into_iter().filter(is_complete).collect();
    let rejected = total - kept.len();
    (kept, rejected)
}

fn is_complete(row: &MergedRow) -> bool {
    !row.name_english.is_blank() && !row.image.is_blank()
}

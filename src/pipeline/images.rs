use crate::pipeline::model::ImageEntry;
use crate::table::Value;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Picks one image per product: the entry with the smallest `PICTURE_ORDER`,
/// ties and unordered entries falling back to sheet order. Entries without an
/// order rank after every ordered one.
pub fn resolve_images(mut entries: Vec<ImageEntry>) -> IndexMap<String, Value> {
    // stable, so equal orders keep sheet order
    entries.sort_by(|left, right| compare_order(left.picture_order, right.picture_order));
    let mut resolved = IndexMap::<String, Value>::new();
    for entry in entries {
        resolved.entry(entry.external_id).or_insert(entry.image);
    }
    resolved
}

fn compare_order(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

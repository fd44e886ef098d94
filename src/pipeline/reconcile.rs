use crate::pipeline::model::CatalogEntry;
use crate::pipeline::model::MergedRow;
use crate::pipeline::model::UpdateRow;
use crate::table::Value;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

/// Left-joins every update row with its catalog entry and resolved image,
/// both keyed by `product_id = external_id`. Each update row yields exactly
/// one merged row; unmatched fields stay null. The update feed's own keys are
/// kept, joined `external_id` columns are not carried over.
pub fn reconcile(
    updates: &[UpdateRow],
    catalog: &[CatalogEntry],
    images: &IndexMap<String, Value>,
) -> Vec<MergedRow> {
    let mut entries = HashMap::<&str, &CatalogEntry>::with_capacity(catalog.len());
    for entry in catalog {
        // repeated ids would fan rows out; the first entry wins
        entries.entry(entry.external_id.as_str()).or_insert(entry);
    }

    let mut catalog_misses = 0usize;
    let mut image_misses = 0usize;
    let merged: Vec<MergedRow> = updates
        .iter()
        .map(|update| {
            let entry = entries.get(update.product_id.as_str());
            let image = images.get(&update.product_id);
            catalog_misses += usize::from(entry.is_none());
            image_misses += usize::from(image.is_none());
            MergedRow {
                product_id: update.product_id.to_owned(),
                store_id: update.store_id.to_owned(),
                price: update.price.clone(),
                quantity: update.quantity.clone(),
                name_english: entry.map(|entry| entry.name_english.clone()).unwrap_or_default(),
                category: entry.map(|entry| entry.category.clone()).unwrap_or_default(),
                sub_category: entry.map(|entry| entry.sub_category.clone()).unwrap_or_default(),
                description: entry.map(|entry| entry.description.clone()).unwrap_or_default(),
                image: image.cloned().unwrap_or_default(),
                name_occurrence: 0,
            }
        })
        .collect();
    debug!(rows = merged.len(), catalog_misses, image_misses, "reconciled update feed");
    merged
}

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::amount::Fixed2;
use crate::models::CanonicalRecord;

// ---------------------------------------------------------------------------
// Node types: category, supplier, product
// ---------------------------------------------------------------------------

/// One source record as a ranked leaf. Duplicate products stay separate:
/// each delivery line keeps its own leaf so quantities and dates remain
/// traceable to the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductLeaf {
    pub unit: String,
    pub line_no: String,
    pub product_name: String,
    pub manufacturer: String,
    pub material_model: String,
    pub quantity: Fixed2,
    pub unit_price: Fixed2,
    pub purchase_value: Fixed2,
    pub received_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierNode {
    pub label: String,
    pub purchase_value: Fixed2,
    pub record_count: usize,
    pub products: Vec<ProductLeaf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    pub label: String,
    pub purchase_value: Fixed2,
    pub record_count: usize,
    pub suppliers: Vec<SupplierNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTree {
    pub file_no: String,
    pub record_count: usize,
    pub total_amount: Fixed2,
    pub categories: Vec<CategoryNode>,
}

// ---------------------------------------------------------------------------
// Leaf display cleanup
// ---------------------------------------------------------------------------

fn dash_if_empty(s: &str) -> String {
    let t = s.trim();
    if t.is_empty() {
        "-".to_string()
    } else {
        t.to_string()
    }
}

/// Unit numbers print as `01unit`, `02unit`, etc. Blanks and non-numeric
/// values pass through (`-` for blank).
fn format_unit(raw: &str) -> String {
    let t = raw.trim();
    if t.is_empty() {
        return "-".to_string();
    }
    match t.parse::<f64>() {
        Ok(n) if n.is_finite() => format!("{:02}unit", n as i64),
        _ => t.to_string(),
    }
}

fn leaf_from(rec: &CanonicalRecord) -> ProductLeaf {
    ProductLeaf {
        unit: format_unit(&rec.unit),
        line_no: dash_if_empty(&rec.line_no),
        product_name: dash_if_empty(&rec.product_name),
        manufacturer: dash_if_empty(&rec.manufacturer),
        material_model: dash_if_empty(&rec.material_model),
        quantity: rec.quantity,
        unit_price: rec.unit_price,
        purchase_value: rec.purchase_value(),
        received_date: rec.received_date,
    }
}

// ---------------------------------------------------------------------------
// rank
// ---------------------------------------------------------------------------

/// Build the ranked purchase hierarchy for one file number. Every level is
/// ordered descending by purchase value; ties keep first-seen order, so
/// identical inputs always produce identical output.
pub fn rank(records: &[CanonicalRecord], file_no: &str) -> RankedTree {
    let selected: Vec<&CanonicalRecord> = records
        .iter()
        .filter(|r| r.file_no == file_no)
        .collect();

    let mut categories: Vec<CategoryNode> = Vec::new();
    let mut cat_index: HashMap<String, usize> = HashMap::new();
    // (category index, supplier label) → supplier index
    let mut sup_index: HashMap<(usize, String), usize> = HashMap::new();

    for rec in &selected {
        let ci = *cat_index
            .entry(rec.classification_name.clone())
            .or_insert_with(|| {
                categories.push(CategoryNode {
                    label: rec.classification_name.clone(),
                    purchase_value: Fixed2::ZERO,
                    record_count: 0,
                    suppliers: Vec::new(),
                });
                categories.len() - 1
            });

        let si = *sup_index
            .entry((ci, rec.supplier_name.clone()))
            .or_insert_with(|| {
                categories[ci].suppliers.push(SupplierNode {
                    label: dash_if_empty(&rec.supplier_name),
                    purchase_value: Fixed2::ZERO,
                    record_count: 0,
                    products: Vec::new(),
                });
                categories[ci].suppliers.len() - 1
            });

        let value = rec.purchase_value();
        let category = &mut categories[ci];
        category.purchase_value += value;
        category.record_count += 1;
        let supplier = &mut category.suppliers[si];
        supplier.purchase_value += value;
        supplier.record_count += 1;
        supplier.products.push(leaf_from(rec));
    }

    // Descending by value at every level; stable sort keeps first-seen
    // order for ties.
    for category in &mut categories {
        for supplier in &mut category.suppliers {
            supplier.products.sort_by_key(|p| Reverse(p.purchase_value));
        }
        category.suppliers.sort_by_key(|s| Reverse(s.purchase_value));
    }
    categories.sort_by_key(|c| Reverse(c.purchase_value));

    RankedTree {
        file_no: file_no.to_string(),
        record_count: selected.len(),
        total_amount: selected.iter().map(|r| r.purchase_value()).sum(),
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        name: &str,
        supplier: &str,
        file_no: &str,
        product: &str,
        qty: i64,
        price: i64,
    ) -> CanonicalRecord {
        CanonicalRecord {
            classification_code: "00".to_string(),
            classification_name: name.to_string(),
            supplier_code: String::new(),
            supplier_name: supplier.to_string(),
            file_no: file_no.to_string(),
            unit: String::new(),
            line_no: String::new(),
            product_name: product.to_string(),
            manufacturer: String::new(),
            material_model: String::new(),
            quantity: Fixed2::from_int(qty),
            received_date: None,
            unit_price: Fixed2::from_int(price),
        }
    }

    #[test]
    fn test_two_rows_one_category_one_supplier() {
        let records = vec![
            record("Bolts", "X", "F1", "bolt-a", 2, 100),
            record("Bolts", "X", "F1", "bolt-b", 3, 100),
        ];
        let tree = rank(&records, "F1");
        assert_eq!(tree.record_count, 2);
        assert_eq!(tree.total_amount, Fixed2::from_int(500));
        assert_eq!(tree.categories.len(), 1);

        let cat = &tree.categories[0];
        assert_eq!(cat.label, "Bolts");
        assert_eq!(cat.purchase_value, Fixed2::from_int(500));
        assert_eq!(cat.suppliers.len(), 1);

        let sup = &cat.suppliers[0];
        assert_eq!(sup.label, "X");
        assert_eq!(sup.purchase_value, Fixed2::from_int(500));
        assert_eq!(sup.products.len(), 2);
        // bolt-b (300) outranks bolt-a (200)
        assert_eq!(sup.products[0].product_name, "bolt-b");
        assert_eq!(sup.products[0].purchase_value, Fixed2::from_int(300));
        assert_eq!(sup.products[1].purchase_value, Fixed2::from_int(200));
    }

    #[test]
    fn test_restricted_to_requested_file_no() {
        let records = vec![
            record("Bolts", "X", "F1", "a", 1, 100),
            record("Bolts", "X", "F2", "b", 9, 900),
        ];
        let tree = rank(&records, "F1");
        assert_eq!(tree.record_count, 1);
        assert_eq!(tree.total_amount, Fixed2::from_int(100));
    }

    #[test]
    fn test_every_level_sorted_descending() {
        let records = vec![
            record("Small", "S1", "F1", "a", 1, 10),
            record("Big", "B1", "F1", "b", 1, 500),
            record("Big", "B2", "F1", "c", 1, 900),
            record("Mid", "M1", "F1", "d", 1, 100),
        ];
        let tree = rank(&records, "F1");
        let labels: Vec<&str> = tree.categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Big", "Mid", "Small"]);
        // within Big, B2 (900) before B1 (500)
        let big = &tree.categories[0];
        assert_eq!(big.suppliers[0].label, "B2");
        assert_eq!(big.suppliers[1].label, "B1");
        for cat in &tree.categories {
            for pair in cat.suppliers.windows(2) {
                assert!(pair[0].purchase_value >= pair[1].purchase_value);
            }
            for sup in &cat.suppliers {
                for pair in sup.products.windows(2) {
                    assert!(pair[0].purchase_value >= pair[1].purchase_value);
                }
            }
        }
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let records = vec![
            record("Cat", "First", "F1", "a", 1, 100),
            record("Cat", "Second", "F1", "b", 1, 100),
            record("Cat", "Third", "F1", "c", 1, 100),
        ];
        let tree = rank(&records, "F1");
        let sups: Vec<&str> = tree.categories[0]
            .suppliers
            .iter()
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(sups, vec!["First", "Second", "Third"]);
        // identical inputs → identical order, every run
        assert_eq!(rank(&records, "F1"), tree);
    }

    #[test]
    fn test_node_values_equal_sum_of_children() {
        let records = vec![
            record("Cat", "X", "F1", "a", 2, 50),
            record("Cat", "X", "F1", "b", 1, 300),
            record("Cat", "Y", "F1", "c", 4, 25),
            record("Other", "Z", "F1", "d", 1, 10),
        ];
        let tree = rank(&records, "F1");
        for cat in &tree.categories {
            let sup_sum: Fixed2 = cat.suppliers.iter().map(|s| s.purchase_value).sum();
            assert_eq!(cat.purchase_value, sup_sum);
            for sup in &cat.suppliers {
                let leaf_sum: Fixed2 = sup.products.iter().map(|p| p.purchase_value).sum();
                assert_eq!(sup.purchase_value, leaf_sum);
            }
        }
        let cat_sum: Fixed2 = tree.categories.iter().map(|c| c.purchase_value).sum();
        assert_eq!(tree.total_amount, cat_sum);
    }

    #[test]
    fn test_duplicate_products_stay_separate_leaves() {
        let records = vec![
            record("Cat", "X", "F1", "same part", 1, 100),
            record("Cat", "X", "F1", "same part", 2, 100),
        ];
        let tree = rank(&records, "F1");
        assert_eq!(tree.categories[0].suppliers[0].products.len(), 2);
    }

    #[test]
    fn test_unknown_file_no_gives_empty_tree() {
        let records = vec![record("Cat", "X", "F1", "a", 1, 1)];
        let tree = rank(&records, "NOPE");
        assert_eq!(tree.record_count, 0);
        assert!(tree.categories.is_empty());
        assert_eq!(tree.total_amount, Fixed2::ZERO);
    }

    #[test]
    fn test_unit_and_line_no_display_cleanup() {
        let mut rec = record("Cat", "X", "F1", "a", 1, 1);
        rec.unit = "1".to_string();
        rec.line_no = String::new();
        let tree = rank(&[rec], "F1");
        let leaf = &tree.categories[0].suppliers[0].products[0];
        assert_eq!(leaf.unit, "01unit");
        assert_eq!(leaf.line_no, "-");

        assert_eq!(format_unit("2.0"), "02unit");
        assert_eq!(format_unit(""), "-");
        assert_eq!(format_unit("A棟"), "A棟");
    }
}

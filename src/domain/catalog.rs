//! Catalogue rules shared by every repository implementation.
//!
//! These functions are pure: repositories load rows, then call into this
//! module so that the PostgreSQL implementation, the order transaction and any
//! other backend agree on grouping, stock and pricing semantics.

use std::collections::{HashMap, HashSet};

use serde_json::json;

use crate::domain::entities::{
    CartLine, Category, CategoryGroup, NewOrderItem, SelectOption, StockLevel, StockLine,
    StockReport, StockStatus,
};
use crate::error::AppError;

/// Separator between path segments of nested category labels.
const LABEL_SEPARATOR: &str = " / ";

/// Groups categories by their top-level ancestor for a select control.
///
/// # Rules
///
/// - Every top-level category forms one group labelled with its name. A
///   category whose parent does not exist (or is itself) counts as top-level.
/// - A group's options are all descendants of its root in depth-first order.
///   Direct children are labelled with their name, deeper levels with the path
///   below the root, e.g. `Shirts / Long sleeve`.
/// - A root without descendants becomes the single option of its own group.
/// - Groups and siblings are ordered by `(sort_order, name)`.
/// - Each category is emitted at most once, so cyclic parent links terminate.
///   Categories only reachable through a cycle are omitted.
pub fn group_for_select(categories: &[Category]) -> Vec<CategoryGroup> {
    let ids: HashSet<i64> = categories.iter().map(|c| c.id).collect();

    let mut children: HashMap<Option<i64>, Vec<&Category>> = HashMap::new();
    for category in categories {
        let parent = category
            .parent_id
            .filter(|p| *p != category.id && ids.contains(p));
        children.entry(parent).or_default().push(category);
    }

    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
    }

    let mut visited = HashSet::new();
    let mut groups = Vec::new();

    for root in children.get(&None).map(Vec::as_slice).unwrap_or_default() {
        visited.insert(root.id);

        let mut options = Vec::new();
        collect_descendants(root.id, &[], &children, &mut visited, &mut options);

        if options.is_empty() {
            options.push(SelectOption {
                value: root.id,
                label: root.name.clone(),
            });
        }

        groups.push(CategoryGroup {
            label: root.name.clone(),
            options,
        });
    }

    groups
}

fn collect_descendants<'a>(
    parent: i64,
    path: &[&'a str],
    children: &HashMap<Option<i64>, Vec<&'a Category>>,
    visited: &mut HashSet<i64>,
    out: &mut Vec<SelectOption>,
) {
    let Some(kids) = children.get(&Some(parent)) else {
        return;
    };

    for kid in kids {
        if !visited.insert(kid.id) {
            continue;
        }

        let mut kid_path = path.to_vec();
        kid_path.push(kid.name.as_str());

        out.push(SelectOption {
            value: kid.id,
            label: kid_path.join(LABEL_SEPARATOR),
        });

        collect_descendants(kid.id, &kid_path, children, visited, out);
    }
}

/// Sums quantities per product, keeping the order of first appearance.
fn aggregate(lines: &[CartLine]) -> Vec<(i64, i64)> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut totals: Vec<(i64, i64)> = Vec::with_capacity(lines.len());

    for line in lines {
        match index.get(&line.product_id) {
            Some(&i) => totals[i].1 += i64::from(line.quantity),
            None => {
                index.insert(line.product_id, totals.len());
                totals.push((line.product_id, i64::from(line.quantity)));
            }
        }
    }

    totals
}

/// Checks requested quantities against current stock.
///
/// Quantities for the same product are summed before comparison. Products
/// missing from `levels` or not public are [`StockStatus::Unavailable`] with
/// zero availability. The report is valid only for a non-empty cart whose
/// lines are all [`StockStatus::Ok`].
///
/// Callers are expected to have rejected non-positive quantities already.
pub fn check_stock(lines: &[CartLine], levels: &[StockLevel]) -> StockReport {
    let by_id: HashMap<i64, &StockLevel> = levels.iter().map(|l| (l.product_id, l)).collect();

    let report_lines: Vec<StockLine> = aggregate(lines)
        .into_iter()
        .map(|(product_id, requested)| {
            let (available, status) = match by_id.get(&product_id) {
                Some(level) if level.is_public => {
                    let status = if requested <= i64::from(level.available) {
                        StockStatus::Ok
                    } else {
                        StockStatus::InsufficientStock
                    };
                    (level.available, status)
                }
                _ => (0, StockStatus::Unavailable),
            };

            StockLine {
                product_id,
                requested,
                available,
                status,
            }
        })
        .collect();

    let valid = !report_lines.is_empty()
        && report_lines.iter().all(|l| l.status == StockStatus::Ok);

    StockReport {
        valid,
        lines: report_lines,
    }
}

/// Prices cart lines from stored product prices.
///
/// Produces one item per product (duplicate lines are merged). Must only be
/// called for carts that passed [`check_stock`].
///
/// # Errors
///
/// Returns [`AppError::Validation`] if a merged quantity or a line total does
/// not fit its column type, and [`AppError::Internal`] if a line references a
/// product absent from `levels`.
pub fn price_lines(
    lines: &[CartLine],
    levels: &[StockLevel],
) -> Result<Vec<NewOrderItem>, AppError> {
    let by_id: HashMap<i64, &StockLevel> = levels.iter().map(|l| (l.product_id, l)).collect();

    aggregate(lines)
        .into_iter()
        .map(|(product_id, requested)| {
            let level = by_id.get(&product_id).ok_or_else(|| {
                AppError::internal(
                    "Priced line references an unknown product",
                    json!({ "product_id": product_id }),
                )
            })?;

            let quantity = i32::try_from(requested).map_err(|_| {
                AppError::bad_request(
                    "Quantity is too large",
                    json!({ "product_id": product_id, "quantity": requested }),
                )
            })?;

            let line_total_cents = level.price_cents.checked_mul(requested).ok_or_else(|| {
                AppError::bad_request(
                    "Line total is too large",
                    json!({ "product_id": product_id }),
                )
            })?;

            Ok(NewOrderItem {
                product_id,
                product_name: level.name.clone(),
                product_slug: level.slug.clone(),
                unit_price_cents: level.price_cents,
                quantity,
                line_total_cents,
            })
        })
        .collect()
}

/// Sums line totals with overflow checking.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the total overflows.
pub fn order_total(items: &[NewOrderItem]) -> Result<i64, AppError> {
    items
        .iter()
        .try_fold(0i64, |acc, item| acc.checked_add(item.line_total_cents))
        .ok_or_else(|| AppError::bad_request("Order total is too large", json!({})))
}

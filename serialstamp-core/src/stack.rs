//! Stack Items and Page Planning
//!
//! A stamp run produces one item per parameter combination (or per table
//! row). Items are laid out `stack_size` pages at a time so that cutting a
//! printed stack keeps consecutive items on top of each other.

use std::collections::HashMap;

use crate::params::{Bindings, Param, ParamError};
use crate::spec::{Layout, Specification};
use crate::template::replace_vars;

/// Variable values for a single stamp.
pub type ItemVars = HashMap<String, String>;

enum Source {
    Product(Vec<Param>),
    Rows(Vec<Bindings>),
}

/// Iterator over every item of a specification, in print order.
///
/// For params the first param varies slowest. Values are produced on
/// demand, so large ranges are never materialised.
pub struct StackItems {
    source: Source,
    next: usize,
    total: usize,
}

impl StackItems {
    pub fn from_spec(spec: &Specification) -> Result<Self, ParamError> {
        if let Some(params) = spec.typed_params()? {
            let total = if params.is_empty() {
                0
            } else {
                params
                    .iter()
                    .try_fold(1usize, |acc, p| acc.checked_mul(p.value_count()))
                    .ok_or(ParamError::TooManyItems)?
            };
            return Ok(Self { source: Source::Product(params), next: 0, total });
        }
        if let Some(rows) = spec.table_rows()? {
            let total = rows.len();
            return Ok(Self { source: Source::Rows(rows), next: 0, total });
        }
        Ok(Self { source: Source::Rows(vec![]), next: 0, total: 0 })
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn item_at(&self, index: usize) -> ItemVars {
        match &self.source {
            Source::Product(params) => {
                let mut vars = ItemVars::new();
                let mut rem = index;
                for param in params.iter().rev() {
                    let count = param.value_count();
                    if let Some(bindings) = param.bindings_at(rem % count) {
                        vars.extend(bindings);
                    }
                    rem /= count;
                }
                vars
            }
            Source::Rows(rows) => rows[index].iter().cloned().collect(),
        }
    }
}

impl Iterator for StackItems {
    type Item = ItemVars;

    fn next(&mut self) -> Option<ItemVars> {
        if self.next >= self.total {
            return None;
        }
        let item = self.item_at(self.next);
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for StackItems {}

/// Substitute one item's variables into every text template of a spec.
pub fn render_texts(spec: &Specification, vars: &ItemVars) -> Vec<String> {
    spec.texts
        .iter()
        .map(|t| replace_vars(&t.template, vars))
        .collect()
}

/// How items are spread across pages and stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackPlan {
    pub item_count: usize,
    pub stack_size: usize,
    pub tickets_per_page: usize,
    pub stack_count: usize,
    pub page_count: usize,
}

impl StackPlan {
    /// `None` when the grid has no cells, the stack size is not positive, or
    /// a stack holds more items than `usize` can count.
    pub fn new(layout: &Layout, stack_size: i64, item_count: usize) -> Option<Self> {
        let tickets_per_page = layout
            .grid_area()
            .and_then(|area| usize::try_from(area).ok())
            .filter(|n| *n > 0)?;
        let stack_size = usize::try_from(stack_size).ok().filter(|n| *n > 0)?;
        // Negative grid dimensions can multiply to a positive area.
        if layout.columns() < 0 {
            return None;
        }
        stack_size.checked_mul(tickets_per_page)?;

        let min_pages = item_count.div_ceil(tickets_per_page);
        let stack_count = min_pages.div_ceil(stack_size);
        Some(Self {
            item_count,
            stack_size,
            tickets_per_page,
            stack_count,
            page_count: stack_count.checked_mul(stack_size)?,
        })
    }

    pub fn for_spec(spec: &Specification, item_count: usize) -> Option<Self> {
        Self::new(&spec.layout, spec.stack_size, item_count)
    }

    /// Item indices printed on page `page_offset` of stack `stack_index`,
    /// in grid-cell order.
    pub fn page_items(&self, stack_index: usize, page_offset: usize) -> Vec<usize> {
        if stack_index >= self.stack_count || page_offset >= self.stack_size {
            return vec![];
        }
        let per_stack = self.stack_size.saturating_mul(self.tickets_per_page);
        let start = stack_index.saturating_mul(per_stack);
        let end = start.saturating_add(per_stack).min(self.item_count);
        (start.saturating_add(page_offset)..end)
            .step_by(self.stack_size)
            .collect()
    }
}

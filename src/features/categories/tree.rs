//! Two-level category forest built from the flat list of the content API.
//!
//! The forest is always rebuilt from scratch; nothing here is patched in
//! place. Depth is capped by the node types themselves: a [`ChildNode`] has no
//! children field, so nothing can be rendered below the subcategory level.

use std::collections::HashMap;

use crate::features::categories::models::Category;
use crate::features::categories::ordering::SiblingGroup;

/// Main category with its ordered subcategories
#[derive(Debug, Clone, PartialEq)]
pub struct RootNode {
    pub category: Category,
    pub children: Vec<ChildNode>,
    /// UI-only, reset on every rebuild
    pub expanded: bool,
}

impl RootNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Subcategory. Records that point at a subcategory as their parent are kept
/// in `overflow` for diagnostics and are never rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildNode {
    pub category: Category,
    pub expanded: bool,
    pub overflow: Vec<Category>,
}

/// Where a category id sits in the rendered forest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Root,
    Child { parent_id: i64 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryForest {
    roots: Vec<RootNode>,
}

impl CategoryForest {
    pub fn roots(&self) -> &[RootNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of rendered nodes (roots plus subcategories)
    pub fn rendered_len(&self) -> usize {
        self.roots.iter().map(|r| 1 + r.children.len()).sum()
    }

    pub fn find_root(&self, id: i64) -> Option<&RootNode> {
        self.roots.iter().find(|r| r.category.id == id)
    }

    pub fn locate(&self, id: i64) -> Option<Placement> {
        for root in &self.roots {
            if root.category.id == id {
                return Some(Placement::Root);
            }
            if root.children.iter().any(|c| c.category.id == id) {
                return Some(Placement::Child {
                    parent_id: root.category.id,
                });
            }
        }
        None
    }

    /// Ids of one sibling group in display order, or `None` when the group's
    /// parent is not a rendered main category.
    pub fn sibling_ids(&self, group: SiblingGroup) -> Option<Vec<i64>> {
        match group {
            SiblingGroup::Roots => Some(self.roots.iter().map(|r| r.category.id).collect()),
            SiblingGroup::ChildrenOf { parent_id } => self
                .find_root(parent_id)
                .map(|root| root.children.iter().map(|c| c.category.id).collect()),
        }
    }

    pub fn retain_roots<F>(&mut self, keep: F)
    where
        F: FnMut(&RootNode) -> bool,
    {
        self.roots.retain(keep);
    }
}

/// Only the first record with a given id owns that id's children
fn children_owned_by<'a>(
    records: &[Category],
    first_index: &HashMap<i64, usize>,
    by_parent: &'a HashMap<i64, Vec<usize>>,
    index: usize,
) -> &'a [usize] {
    let id = records[index].id;
    if first_index.get(&id) != Some(&index) {
        return &[];
    }
    by_parent.get(&id).map(Vec::as_slice).unwrap_or(&[])
}

/// Build the two-level forest from a flat, unordered list.
///
/// - A record is a root when its `parent_id` is absent or does not resolve to
///   any record in the list.
/// - Parent resolution only looks at the immediate `parent_id`. A record whose
///   parent is a subcategory ends up in that subcategory's `overflow`; deeper
///   chains and cycles are attached to nodes that are never rendered.
/// - With duplicate ids, the first occurrence is the parent-resolution target.
/// - Roots and each root's children are sorted stably by `display_order`.
///
/// Never fails: malformed input degrades to flatter output.
pub fn build_tree(records: &[Category]) -> CategoryForest {
    let mut first_index: HashMap<i64, usize> = HashMap::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        first_index.entry(record.id).or_insert(index);
    }

    let mut by_parent: HashMap<i64, Vec<usize>> = HashMap::new();
    let mut root_indices = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match record
            .parent_id()
            .filter(|parent| first_index.contains_key(parent))
        {
            Some(parent) => by_parent.entry(parent).or_default().push(index),
            None => root_indices.push(index),
        }
    }

    let owned_children =
        |index: usize| children_owned_by(records, &first_index, &by_parent, index);

    let mut roots: Vec<RootNode> = root_indices
        .iter()
        .map(|&root_index| {
            let mut children: Vec<ChildNode> = owned_children(root_index)
                .iter()
                .map(|&child_index| ChildNode {
                    category: records[child_index].clone(),
                    expanded: false,
                    overflow: owned_children(child_index)
                        .iter()
                        .map(|&i| records[i].clone())
                        .collect(),
                })
                .collect();
            children.sort_by_key(|c| c.category.display_order);

            RootNode {
                category: records[root_index].clone(),
                children,
                expanded: false,
            }
        })
        .collect();
    roots.sort_by_key(|r| r.category.display_order);

    let forest = CategoryForest { roots };

    let hidden = records.len() - forest.rendered_len();
    if hidden > 0 {
        tracing::debug!(
            "Category tree built with {} roots; {} records nested too deep to render",
            forest.roots.len(),
            hidden
        );
    } else {
        tracing::debug!("Category tree built with {} roots", forest.roots.len());
    }

    forest
}

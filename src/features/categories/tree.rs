//! Flat category list to nested forest.

use std::collections::{HashMap, VecDeque};

use uuid::Uuid;

use crate::features::categories::models::Category;
use crate::shared::constants::CATEGORY_TREE_MAX_DEPTH;

/// A category together with its direct children, in input order
#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

/// Build a forest from a flat, already sorted list.
///
/// A record whose parent is absent from the input becomes a root. A record
/// that would nest deeper than `CATEGORY_TREE_MAX_DEPTH` levels starts a new
/// root after the regular ones. Records caught in a parent cycle are
/// unreachable from any root; they are appended as roots in input order,
/// with the cycle cut at the first one. Every input record appears exactly
/// once in the output.
pub fn build_forest(categories: Vec<Category>) -> Vec<CategoryNode> {
    let index: HashMap<Uuid, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); categories.len()];
    let mut pending = VecDeque::new();

    for (i, category) in categories.iter().enumerate() {
        match category.parent_id.and_then(|p| index.get(&p)) {
            Some(&parent) if parent != i => children[parent].push(i),
            _ => pending.push_back(i),
        }
    }

    let mut slots: Vec<Option<Category>> = categories.into_iter().map(Some).collect();
    let mut forest = Vec::new();
    let mut unvisited = 0;

    loop {
        let root = match pending.pop_front() {
            Some(root) => root,
            // Whatever is left sits on a cycle
            None => match (unvisited..slots.len()).find(|&i| slots[i].is_some()) {
                Some(i) => {
                    unvisited = i + 1;
                    i
                }
                None => break,
            },
        };

        if let Some(node) = attach(root, &children, &mut slots, &mut pending) {
            forest.push(node);
        }
    }

    forest
}

struct Frame {
    index: usize,
    cursor: usize,
    category: Category,
    children: Vec<CategoryNode>,
}

/// Depth-first walk from `root` on an explicit stack, building nodes bottom-up.
/// Children past the depth limit are pushed onto `deferred`.
fn attach(
    root: usize,
    children: &[Vec<usize>],
    slots: &mut [Option<Category>],
    deferred: &mut VecDeque<usize>,
) -> Option<CategoryNode> {
    let category = slots[root].take()?;
    let mut stack = vec![Frame {
        index: root,
        cursor: 0,
        category,
        children: Vec::new(),
    }];

    while let Some(frame) = stack.last_mut() {
        let next = children[frame.index].get(frame.cursor).copied();

        if let Some(child) = next {
            frame.cursor += 1;
            if stack.len() >= CATEGORY_TREE_MAX_DEPTH {
                deferred.push_back(child);
            } else if let Some(category) = slots[child].take() {
                stack.push(Frame {
                    index: child,
                    cursor: 0,
                    category,
                    children: Vec::new(),
                });
            }
            continue;
        }

        let done = stack.pop()?;
        let node = CategoryNode {
            category: done.category,
            children: done.children,
        };
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => return Some(node),
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(name: &str, parent_id: Option<Uuid>) -> Category {
        let now = Utc::now();
        Category {
            id: Uuid::now_v7(),
            parent_id,
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: None,
            image: None,
            icon: None,
            is_active: true,
            position: 0,
            products_count: 0,
            seo: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Pre-order walk, the inverse of `build_forest` for acyclic input
    fn flatten(forest: &[CategoryNode]) -> Vec<Category> {
        let mut out = Vec::new();
        for node in forest {
            out.push(node.category.clone());
            out.extend(flatten(&node.children));
        }
        out
    }

    /// Shape of a forest as (name, children) pairs, for structural comparison
    fn shape(forest: &[CategoryNode]) -> Vec<(String, Vec<String>)> {
        forest
            .iter()
            .flat_map(|node| {
                let mut rows = vec![(
                    node.category.name.clone(),
                    node.children
                        .iter()
                        .map(|c| c.category.name.clone())
                        .collect(),
                )];
                rows.extend(shape(&node.children));
                rows
            })
            .collect()
    }

    fn names(nodes: &[CategoryNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.category.name.as_str()).collect()
    }

    #[test]
    fn test_nests_children_in_input_order() {
        let root = category("Scales", None);
        let floor = category("Floor", Some(root.id));
        let bench = category("Bench", Some(root.id));
        let pallet = category("Pallet", Some(floor.id));

        let forest = build_forest(vec![root, floor, bench, pallet]);

        assert_eq!(names(&forest), vec!["Scales"]);
        assert_eq!(names(&forest[0].children), vec!["Floor", "Bench"]);
        assert_eq!(names(&forest[0].children[0].children), vec!["Pallet"]);
    }

    #[test]
    fn test_child_listed_before_parent_still_nests() {
        let root = category("Scales", None);
        let child = category("Floor", Some(root.id));

        let forest = build_forest(vec![child, root]);

        assert_eq!(names(&forest), vec!["Scales"]);
        assert_eq!(names(&forest[0].children), vec!["Floor"]);
    }

    #[test]
    fn test_dangling_parent_is_promoted_to_root() {
        let first = category("One", None);
        let orphan = category("Two", Some(Uuid::now_v7()));

        let forest = build_forest(vec![first, orphan]);

        assert_eq!(names(&forest), vec!["One", "Two"]);
        assert!(forest.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn test_rebuild_from_flattened_forest_is_isomorphic() {
        let a = category("A", None);
        let b = category("B", None);
        let a1 = category("A1", Some(a.id));
        let a2 = category("A2", Some(a.id));
        let a1x = category("A1x", Some(a1.id));
        let b1 = category("B1", Some(b.id));

        let forest = build_forest(vec![a, b, a1, a2, a1x, b1]);
        let rebuilt = build_forest(flatten(&forest));
        let rebuilt_twice = build_forest(flatten(&rebuilt));

        assert_eq!(shape(&forest), shape(&rebuilt));
        assert_eq!(shape(&rebuilt), shape(&rebuilt_twice));
    }

    #[test]
    fn test_cycle_members_are_kept_as_roots() {
        let mut a = category("A", None);
        let b = category("B", Some(a.id));
        a.parent_id = Some(b.id);
        let c = category("C", None);

        let forest = build_forest(vec![a, b, c]);

        assert_eq!(names(&forest), vec!["C", "A"]);
        assert_eq!(names(&forest[1].children), vec!["B"]);
        assert!(forest[1].children[0].children.is_empty());
        assert_eq!(flatten(&forest).len(), 3);
    }

    #[test]
    fn test_self_parent_is_a_root() {
        let mut a = category("A", None);
        a.parent_id = Some(a.id);

        let forest = build_forest(vec![a]);

        assert_eq!(names(&forest), vec!["A"]);
        assert!(forest[0].children.is_empty());
    }

    fn depth(forest: &[CategoryNode]) -> usize {
        forest
            .iter()
            .map(|n| 1 + depth(&n.children))
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_long_parent_chain_is_split_at_max_depth() {
        let mut chain = vec![category("C0", None)];
        for i in 1..10_000 {
            let parent = chain[i - 1].id;
            chain.push(category(&format!("C{}", i), Some(parent)));
        }

        let forest = build_forest(chain);

        assert_eq!(forest.len(), 10_000_usize.div_ceil(CATEGORY_TREE_MAX_DEPTH));
        assert_eq!(depth(&forest), CATEGORY_TREE_MAX_DEPTH);
        assert_eq!(forest[0].category.name, "C0");
        assert_eq!(
            forest[1].category.name,
            format!("C{}", CATEGORY_TREE_MAX_DEPTH)
        );
        assert_eq!(flatten(&forest).len(), 10_000);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_forest(Vec::new()).is_empty());
    }
}

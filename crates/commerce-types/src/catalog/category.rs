//! Category types for product organization.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category in the catalog hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    /// Parent category ID (None for root categories).
    pub parent_id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Sort order position within parent.
    pub position: i32,
    /// Number of products in this category, when reported.
    pub product_count: Option<i64>,
    /// Nested children, populated by tree queries.
    #[serde(default)]
    pub children: Vec<Category>,
}

impl Category {
    /// Check if this is a root category.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this category is a direct child of another.
    pub fn is_child_of(&self, parent: &Category) -> bool {
        self.parent_id.as_ref() == Some(&parent.id)
    }

    /// Depth-first search for a category by slug in this subtree.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Category> {
        if self.slug == slug {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_slug(slug))
    }

    /// Assemble a forest from a flat list using `parent_id` links.
    ///
    /// Categories whose parent is missing from the list become roots.
    pub fn build_tree(flat: Vec<Category>) -> Vec<Category> {
        let ids: Vec<CategoryId> = flat.iter().map(|c| c.id.clone()).collect();
        let (roots, mut rest): (Vec<_>, Vec<_>) = flat.into_iter().partition(|c| {
            c.parent_id
                .as_ref()
                .map(|p| !ids.contains(p))
                .unwrap_or(true)
        });

        let mut roots = roots;
        for root in &mut roots {
            attach_children(root, &mut rest);
        }
        roots.sort_by_key(|c| c.position);
        roots
    }
}

fn attach_children(parent: &mut Category, pool: &mut Vec<Category>) {
    let (mut children, remaining): (Vec<_>, Vec<_>) =
        pool.drain(..).partition(|c| c.parent_id.as_ref() == Some(&parent.id));
    *pool = remaining;
    for child in &mut children {
        attach_children(child, pool);
    }
    children.sort_by_key(|c| c.position);
    parent.children.extend(children);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, parent: Option<&str>, slug: &str, position: i32) -> Category {
        Category {
            id: CategoryId::new(id),
            parent_id: parent.map(CategoryId::new),
            name: slug.to_string(),
            slug: slug.to_string(),
            description: None,
            image_url: None,
            position,
            product_count: None,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_category_hierarchy() {
        let root = category("1", None, "jewelry", 0);
        let child = category("2", Some("1"), "rings", 0);

        assert!(root.is_root());
        assert!(!child.is_root());
        assert!(child.is_child_of(&root));
    }

    #[test]
    fn test_build_tree() {
        let flat = vec![
            category("3", Some("1"), "necklaces", 2),
            category("1", None, "jewelry", 0),
            category("2", Some("1"), "rings", 1),
            category("4", Some("2"), "engagement", 0),
            category("5", None, "watches", 1),
        ];

        let tree = Category::build_tree(flat);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].slug, "jewelry");
        assert_eq!(tree[0].children[0].slug, "rings");
        assert_eq!(tree[0].children[1].slug, "necklaces");
        assert!(tree[0].find_by_slug("engagement").is_some());
        assert!(tree[1].find_by_slug("engagement").is_none());
    }
}

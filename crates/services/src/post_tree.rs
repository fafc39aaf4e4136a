//! Post-tree linearization.
//!
//! Turns the unordered posts of one thread into the page requested by a
//! [`PostsQuery`]. Three display modes are supported:
//!
//! * `flat`: posts by id, `since` is an exclusive id bound.
//! * `tree`: depth-first pre-order over the parent/child forest with siblings
//!   in the requested direction; `since` resumes right after the cursor's
//!   position in that order and `limit` counts posts.
//! * `parent_tree`: up to `limit` top-level posts in the requested direction,
//!   each followed by its whole subtree in ascending pre-order; `since` is
//!   compared on the cursor's top-level ancestor.
//!
//! A cursor that does not name a post of this thread applies no exclusion.
//! Traversal uses an explicit stack, so deep reply chains cannot overflow.

use std::collections::HashMap;

use domains::{Post, PostsQuery, SortMode};

/// Orders and paginates `posts`, which must all belong to the same thread.
pub fn linearize(posts: Vec<Post>, query: &PostsQuery) -> Vec<Post> {
    let limit = usize::try_from(query.limit).unwrap_or(0);
    match query.sort {
        SortMode::Flat => flat(posts, query.since, query.desc, limit),
        SortMode::Tree => {
            let forest = Forest::new(posts);
            let order = forest.preorder(&forest.roots(query.desc), query.desc);
            let start = query
                .since
                .and_then(|since| order.iter().position(|&idx| forest.id(idx) == since))
                .map_or(0, |pos| pos + 1);
            let page: Vec<usize> = order.into_iter().skip(start).take(limit).collect();
            forest.take(&page)
        }
        SortMode::ParentTree => {
            let forest = Forest::new(posts);
            let roots = forest.roots(query.desc);
            let start = query
                .since
                .and_then(|since| forest.root_of(since))
                .and_then(|root| roots.iter().position(|&idx| idx == root))
                .map_or(0, |pos| pos + 1);
            let page: Vec<usize> = roots
                .iter()
                .skip(start)
                .take(limit)
                .flat_map(|&root| forest.preorder(&[root], false))
                .collect();
            forest.take(&page)
        }
    }
}

fn flat(mut posts: Vec<Post>, since: Option<i64>, desc: bool, limit: usize) -> Vec<Post> {
    if desc {
        posts.sort_by(|a, b| b.id.cmp(&a.id));
    } else {
        posts.sort_by_key(|post| post.id);
    }
    posts
        .into_iter()
        .filter(|post| match since {
            Some(since) if desc => post.id < since,
            Some(since) => post.id > since,
            None => true,
        })
        .take(limit)
        .collect()
}

/// Posts of one thread indexed by id, with child lists in ascending id order.
struct Forest {
    posts: Vec<Option<Post>>,
    index: HashMap<i64, usize>,
    children: HashMap<i64, Vec<usize>>,
    roots: Vec<usize>,
}

impl Forest {
    fn new(mut posts: Vec<Post>) -> Self {
        posts.sort_by_key(|post| post.id);

        let index: HashMap<i64, usize> = posts
            .iter()
            .enumerate()
            .map(|(idx, post)| (post.id, idx))
            .collect();

        let mut children: HashMap<i64, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (idx, post) in posts.iter().enumerate() {
            // A parent missing from the set is treated like no parent at all.
            if post.is_root() || !index.contains_key(&post.parent) {
                roots.push(idx);
            } else {
                children.entry(post.parent).or_default().push(idx);
            }
        }

        Self {
            posts: posts.into_iter().map(Some).collect(),
            index,
            children,
            roots,
        }
    }

    fn id(&self, idx: usize) -> i64 {
        self.posts[idx].as_ref().map_or(0, |post| post.id)
    }

    fn parent(&self, idx: usize) -> i64 {
        self.posts[idx].as_ref().map_or(0, |post| post.parent)
    }

    fn roots(&self, desc: bool) -> Vec<usize> {
        if desc {
            self.roots.iter().rev().copied().collect()
        } else {
            self.roots.clone()
        }
    }

    /// Index of the top-level ancestor of post `id`, if it is in this thread.
    fn root_of(&self, id: i64) -> Option<usize> {
        let mut idx = *self.index.get(&id)?;
        // Parents always have smaller ids, so the walk terminates.
        while let Some(&parent) = self.index.get(&self.parent(idx)) {
            if parent >= idx {
                break;
            }
            idx = parent;
        }
        Some(idx)
    }

    /// Pre-order over the subtrees of `roots`, visited in the given order.
    /// Siblings below the roots are visited by descending id when `desc`.
    fn preorder(&self, roots: &[usize], desc: bool) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.posts.len());
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();

        while let Some(idx) = stack.pop() {
            order.push(idx);
            if let Some(kids) = self.children.get(&self.id(idx)) {
                // The next sibling to visit has to end up on top of the stack.
                if desc {
                    stack.extend(kids.iter().copied());
                } else {
                    stack.extend(kids.iter().rev().copied());
                }
            }
        }
        order
    }

    /// Moves the posts at `order` out of the forest. Each index is used once.
    fn take(mut self, order: &[usize]) -> Vec<Post> {
        order
            .iter()
            .filter_map(|&idx| self.posts[idx].take())
            .collect()
    }
}

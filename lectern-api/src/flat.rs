//! Serialized form of comment trees.
//!
//! A tree is written as a list of nodes, each one naming its parent and coming
//! after it. Reply depth then never becomes nesting depth in the serialized
//! document, which deserializers cap. Node types skip their `children` field
//! in their own serde impls, and containers holding trees go through this
//! module with `#[serde(with = "...")]`.

use std::collections::{HashMap, HashSet};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::CommentId;

pub trait Tree: Sized {
    fn id(&self) -> CommentId;
    fn children(&self) -> &[Self];
    fn children_mut(&mut self) -> &mut Vec<Self>;
}

#[derive(serde::Serialize)]
struct NodeRef<'a, T> {
    parent: Option<CommentId>,
    node: &'a T,
}

#[derive(serde::Deserialize)]
struct Node<T> {
    parent: Option<CommentId>,
    node: T,
}

fn flatten<T: Tree>(roots: &[T]) -> Vec<NodeRef<'_, T>> {
    let mut res = Vec::new();
    let mut todo = vec![(None, roots)];
    while let Some((parent, nodes)) = todo.pop() {
        for n in nodes {
            res.push(NodeRef { parent, node: n });
            if !n.children().is_empty() {
                todo.push((Some(n.id()), n.children()));
            }
        }
    }
    res
}

fn build<T: Tree>(nodes: Vec<Node<T>>) -> Result<Vec<T>, String> {
    let mut seen = HashSet::with_capacity(nodes.len());
    for n in &nodes {
        let id = n.node.id();
        if let Some(parent) = n.parent {
            if !seen.contains(&parent) {
                return Err(format!("comment {id:?} comes before its parent {parent:?}"));
            }
        }
        if !seen.insert(id) {
            return Err(format!("comment {id:?} appears twice"));
        }
    }

    // Walking backwards, every node's replies are complete by the time it is reached
    let mut replies = HashMap::<CommentId, Vec<T>>::new();
    let mut roots = Vec::new();
    for Node { parent, mut node } in nodes.into_iter().rev() {
        if let Some(mut children) = replies.remove(&node.id()) {
            children.reverse();
            *node.children_mut() = children;
        }
        match parent {
            None => roots.push(node),
            Some(p) => replies.entry(p).or_default().push(node),
        }
    }
    roots.reverse();
    Ok(roots)
}

#[allow(clippy::ptr_arg)]
pub fn serialize<T, S>(roots: &Vec<T>, s: S) -> Result<S::Ok, S::Error>
where
    T: Tree + Serialize,
    S: Serializer,
{
    s.collect_seq(flatten(roots))
}

pub fn deserialize<'de, T, D>(d: D) -> Result<Vec<T>, D::Error>
where
    T: Tree + Deserialize<'de>,
    D: Deserializer<'de>,
{
    let nodes = Vec::<Node<T>>::deserialize(d)?;
    build(nodes).map_err(de::Error::custom)
}

/// Same format, for a field holding exactly one tree
pub mod single {
    use super::*;

    pub fn serialize<T, S>(tree: &T, s: S) -> Result<S::Ok, S::Error>
    where
        T: Tree + Serialize,
        S: Serializer,
    {
        s.collect_seq(flatten(std::slice::from_ref(tree)))
    }

    pub fn deserialize<'de, T, D>(d: D) -> Result<T, D::Error>
    where
        T: Tree + Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let mut roots = super::deserialize::<T, D>(d)?;
        match roots.len() {
            1 => Ok(roots.remove(0)),
            n => Err(de::Error::custom(format!(
                "expected a single comment tree, got {n}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
    struct Item {
        id: CommentId,
        #[serde(skip)]
        children: Vec<Item>,
    }

    impl Tree for Item {
        fn id(&self) -> CommentId {
            self.id
        }

        fn children(&self) -> &[Item] {
            &self.children
        }

        fn children_mut(&mut self) -> &mut Vec<Item> {
            &mut self.children
        }
    }

    fn item(children: Vec<Item>) -> Item {
        Item {
            id: CommentId(Uuid::new_v4()),
            children,
        }
    }

    #[derive(Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
    struct Forest {
        #[serde(with = "crate::flat")]
        roots: Vec<Item>,
    }

    #[derive(Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
    struct One {
        #[serde(with = "crate::flat::single")]
        tree: Item,
    }

    #[test]
    fn forest_keeps_shape_and_order() {
        let forest = Forest {
            roots: vec![
                item(vec![item(vec![item(vec![])]), item(vec![]), item(vec![item(vec![])])]),
                item(vec![]),
                item(vec![item(vec![])]),
            ],
        };
        let json = serde_json::to_string(&forest).unwrap();
        assert_eq!(serde_json::from_str::<Forest>(&json).unwrap(), forest);
    }

    #[test]
    fn depth_does_not_nest_the_document() {
        let mut tree = item(vec![]);
        for _ in 0..1000 {
            tree = item(vec![tree]);
        }
        let one = One { tree };
        let json = serde_json::to_vec(&one).unwrap();
        assert_eq!(serde_json::from_slice::<One>(&json).unwrap(), one);
    }

    #[test]
    fn broken_documents_are_rejected() {
        let a = CommentId(Uuid::new_v4());
        let b = CommentId(Uuid::new_v4());
        let node = |parent: Option<CommentId>, id: CommentId| {
            serde_json::json!({ "parent": parent, "node": { "id": id } })
        };
        let child_first = serde_json::json!({ "roots": [node(Some(a), b), node(None, a)] });
        assert!(serde_json::from_value::<Forest>(child_first).is_err());
        let twice = serde_json::json!({ "roots": [node(None, a), node(None, a)] });
        assert!(serde_json::from_value::<Forest>(twice).is_err());
        let two_trees = serde_json::json!({ "tree": [node(None, a), node(None, b)] });
        assert!(serde_json::from_value::<One>(two_trees).is_err());
    }
}

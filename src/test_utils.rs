use std::{
    alloc::Layout,
    cell::Cell,
    cmp::Ordering,
    convert::Infallible,
    fmt::{Debug, Display, Write},
    mem::MaybeUninit,
};

use proptest::prelude::*;

use crate::{
    alloc::{Global, NodeAllocator},
    error::AllocError,
    node::Node,
    AvlTree,
};

const KEY_MAX: i32 = 500;

/// Generate arbitrary keys from [-[`KEY_MAX`]..[`KEY_MAX`]).
///
/// A small key domain encourages multiple operations to act on the same key.
pub(crate) fn arbitrary_key() -> impl Strategy<Value = i32> {
    -KEY_MAX..KEY_MAX
}

pub(crate) fn cmp_i32(key: &i32, payload: &i32) -> Ordering {
    key.cmp(payload)
}

pub(crate) fn ctor_i32(key: &i32) -> Result<i32, Infallible> {
    Ok(*key)
}

pub(crate) fn failing_ctor(_key: &i32) -> Result<i32, &'static str> {
    Err("no")
}

/// The maximum height of an AVL tree holding `n` nodes.
pub(crate) fn max_avl_height(n: usize) -> u8 {
    (1.44 * ((n + 2) as f64).log2()).ceil() as u8
}

/// A [`NodeAllocator`] that satisfies a limited number of requests before
/// refusing all others.
#[derive(Debug)]
pub(crate) struct Budget {
    remaining: Cell<usize>,
}

impl Budget {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            remaining: Cell::new(n),
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.remaining.get()
    }

    pub(crate) fn refill(&self, n: usize) {
        self.remaining.set(self.remaining.get() + n);
    }
}

impl NodeAllocator for Budget {
    fn allocate<T>(&self) -> Result<Box<MaybeUninit<T>>, AllocError> {
        match self.remaining.get() {
            0 => Err(AllocError::new(Layout::new::<T>())),
            n => {
                self.remaining.set(n - 1);
                Global.allocate()
            }
        }
    }
}

/// Return the payloads of the subtree rooted at `n` in order.
pub(crate) fn in_order<P>(n: Option<&Node<P>>) -> Vec<&P> {
    let mut out = vec![];
    let mut stack = vec![];
    let mut ptr = n;

    loop {
        // Descend down the left side of the subtree.
        while let Some(v) = ptr {
            stack.push(v);
            ptr = v.left();
        }

        let Some(v) = stack.pop() else {
            return out;
        };

        out.push(v.payload());
        ptr = v.right();
    }
}

/// Assert the BST and AVL properties of tree nodes, ensuring the tree is
/// well-formed.
pub(crate) fn validate_tree_structure<P, A>(t: &AvlTree<P, A>)
where
    P: Ord + Debug,
{
    let root = match t.root() {
        Some(v) => v,
        None => return,
    };

    // Perform a pre-order traversal of the tree.
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        // Prepare to visit the children
        stack.extend(n.left().iter().chain(n.right().iter()));

        // Invariant 1: the height of this node is always +1 of the maximum
        // child height, with an absent child at height 0.
        let left_height = n.left().map(|v| v.height()).unwrap_or_default();
        let right_height = n.right().map(|v| v.height()).unwrap_or_default();
        let want_height = left_height.max(right_height) + 1;

        assert_eq!(
            n.height(),
            want_height,
            "expect node {:?} to have height {}, has {}",
            n.payload(),
            want_height,
            n.height(),
        );

        // Invariant 2: the absolute height difference between the left
        // subtree and right subtree (the "balance factor") cannot
        // exceed 1.
        let balance = (left_height as i64 - right_height as i64).abs();
        assert!(balance <= 1, "balance={balance}, node={:?}", n.payload());
    }

    // Invariant 3: every key in a left subtree is strictly less than its
    // ancestor, and every key in a right subtree is strictly greater, which
    // holds if an in-order walk is strictly ascending.
    let payloads = in_order(Some(root));
    for window in payloads.windows(2) {
        assert!(window[0] < window[1], "{:?} >= {:?}", window[0], window[1]);
    }
}

/// Render the subtree rooted at `n` as a Graphviz digraph, including the
/// height of each node.
///
/// Two trees render identically only if they have the same shape, payloads
/// and heights.
pub(crate) fn print_dot<P>(n: Option<&Node<P>>) -> String
where
    P: Display,
{
    let mut buf = String::new();

    writeln!(buf, "digraph {{").unwrap();
    writeln!(buf, r#"bgcolor = "transparent";"#).unwrap();
    writeln!(
        buf,
        r#"node [shape = record; style = filled; fontcolor = orange4; fillcolor = white;];"#
    )
    .unwrap();
    if let Some(n) = n {
        recurse(n, &mut buf);
    }
    writeln!(buf, "}}").unwrap();

    buf
}

fn recurse<P, W>(n: &Node<P>, buf: &mut W)
where
    W: std::fmt::Write,
    P: Display,
{
    writeln!(
        buf,
        r#""{}" [label="{} | h={}"];"#,
        n.payload(),
        n.payload(),
        n.height(),
    )
    .unwrap();

    for v in [n.left(), n.right()] {
        match v {
            Some(v) => {
                writeln!(
                    buf,
                    "\"{}\" -> \"{}\" [color = \"orange1\";];",
                    n.payload(),
                    v.payload()
                )
                .unwrap();
                recurse(v, buf);
            }
            None => {
                writeln!(buf, "\"null_{}\" [shape=point,style=invis];", n.payload()).unwrap();
                writeln!(
                    buf,
                    "\"{}\" -> \"null_{}\" [style=invis];",
                    n.payload(),
                    n.payload()
                )
                .unwrap();
            }
        };
    }
}

#[test]
fn test_print_dot() {
    let mut t = AvlTree::new();
    for k in [2, 1] {
        t.insert_with(&k, cmp_i32, ctor_i32).unwrap();
    }

    let got = print_dot(t.root());
    assert!(got.contains(r#""2" [label="2 | h=2"];"#));
    assert!(got.contains(r#""1" [label="1 | h=1"];"#));
    assert!(got.contains(r#""2" -> "1""#));
    assert!(got.contains(r#""2" -> "null_2" [style=invis];"#));

    assert_eq!(print_dot::<i32>(None), "digraph {\nbgcolor = \"transparent\";\nnode [shape = record; style = filled; fontcolor = orange4; fillcolor = white;];\n}\n");
}

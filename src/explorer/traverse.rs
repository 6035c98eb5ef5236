//! Unbounded pre-order traversal shared by the flat queries.

use crate::data::{join_path, Container, NodeKind};
use crate::error::{RasscopeError, Result};

/// Visit every node below the root in pre-order, children in container order.
///
/// The first error, from the container or from `visit`, stops the walk.
pub fn walk<C: Container + ?Sized>(
    container: &C,
    visit: &mut dyn FnMut(&str, NodeKind) -> Result<()>,
) -> Result<()> {
    walk_group(container, "/", visit)
}

fn walk_group<C: Container + ?Sized>(
    container: &C,
    path: &str,
    visit: &mut dyn FnMut(&str, NodeKind) -> Result<()>,
) -> Result<()> {
    for name in container.children(path)? {
        let child = join_path(path, &name);
        let kind = container.kind(&child)?;
        visit(&child, kind)?;
        if kind == NodeKind::Group {
            walk_group(container, &child, visit)?;
        }
    }
    Ok(())
}

/// Group and dataset totals for a whole container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeCounts {
    /// Groups, root included.
    pub groups: usize,
    /// Datasets.
    pub datasets: usize,
}

/// Count groups (root included) and datasets in the whole container.
///
/// On a traversal failure the counts gathered up to that point are returned
/// together with the error.
pub fn count_nodes<C: Container + ?Sized>(
    container: &C,
) -> (NodeCounts, Option<RasscopeError>) {
    let mut counts = NodeCounts {
        groups: 1,
        datasets: 0,
    };
    let outcome = walk(container, &mut |_, kind| {
        match kind {
            NodeKind::Group => counts.groups += 1,
            NodeKind::Dataset => counts.datasets += 1,
        }
        Ok(())
    });
    (counts, outcome.err())
}

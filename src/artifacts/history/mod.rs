//! Commit history traversal
//!
//! The first-parent walk is the single primitive every history operation is
//! built on: `log` renders it, `is_ancestor` tests membership in it, and
//! `merge_base` drives the fast-forward decision during merge.
//!
//! `merge_base(a, b)` returns `b` iff `b` lies on `a`'s first-parent chain.
//! A full lowest-common-ancestor search would intersect the complete
//! ancestor sets of both inputs; this walk-one-side variant is sufficient
//! for the fast-forward decision and for linear histories.

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;

/// Lazy first-parent iterator over commit history
///
/// Yields the starting commit first, then each first parent until a root
/// commit is reached. The write path never creates cycles, so the walk is
/// finite.
pub struct FirstParentWalk<'db> {
    database: &'db Database,
    next: Option<ObjectId>,
}

impl<'db> FirstParentWalk<'db> {
    pub fn new(database: &'db Database, start: ObjectId) -> Self {
        FirstParentWalk {
            database,
            next: Some(start),
        }
    }
}

impl Iterator for FirstParentWalk<'_> {
    type Item = anyhow::Result<ObjectId>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        let commit = match self.database.parse_object_as_commit(&current) {
            Ok(Some(commit)) => commit,
            Ok(None) => {
                return Some(Err(anyhow::anyhow!("object {} is not a commit", current)));
            }
            Err(err) => return Some(Err(err)),
        };

        self.next = commit.parent().cloned();
        Some(Ok(current))
    }
}

/// Whether `ancestor` lies on the first-parent chain of `descendant`
///
/// A commit is considered its own ancestor.
pub fn is_ancestor(
    database: &Database,
    ancestor: &ObjectId,
    descendant: &ObjectId,
) -> anyhow::Result<bool> {
    for oid in FirstParentWalk::new(database, descendant.clone()) {
        if &oid? == ancestor {
            return Ok(true);
        }
    }

    Ok(false)
}

/// First commit on `a`'s first-parent chain that equals `b`
///
/// Returns `b` when `b` is a first-parent ancestor of `a`, `None` otherwise.
pub fn merge_base(
    database: &Database,
    a: &ObjectId,
    b: &ObjectId,
) -> anyhow::Result<Option<ObjectId>> {
    for oid in FirstParentWalk::new(database, a.clone()) {
        let oid = oid?;
        if &oid == b {
            return Ok(Some(oid));
        }
    }

    Ok(None)
}

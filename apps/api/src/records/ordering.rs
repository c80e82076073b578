//! Manual ordering of history, career and qualification entries.

use serde::Deserialize;

use crate::models::{CareerEntry, HistoryEntry, QualificationEntry};
use crate::records::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// A record the user can reorder by hand.
pub trait Sequenced: Record {
    fn set_order(&mut self, order: i32);

    /// Whether `other` is reordered together with `self`.
    fn same_group(&self, _other: &Self) -> bool {
        true
    }
}

impl Sequenced for HistoryEntry {
    fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    // Education and work rows are sequenced independently.
    fn same_group(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Sequenced for CareerEntry {
    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

impl Sequenced for QualificationEntry {
    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

/// Order for a new record appended to the group of `record`: one past the
/// largest order in that group, or 0 for an empty group.
pub fn next_order<T: Sequenced>(existing: &[T], record: &T) -> i32 {
    existing
        .iter()
        .filter(|r| r.id() != record.id() && r.same_group(record))
        .map(|r| r.order())
        .max()
        .map_or(0, |max| max + 1)
}

/// Swaps the record `id` with its neighbour in `direction`.
///
/// `records` must be sorted the way `repo::load_all` returns them. Returns the
/// records whose order changed (empty at either end of the group), or `None`
/// when `id` is unknown. When orders in the group collide, the group is first
/// renumbered 0..n in its current sequence, and every renumbered record is
/// part of the result.
pub fn plan_move<T: Sequenced + Clone>(
    records: &[T],
    id: i64,
    direction: Direction,
) -> Option<Vec<T>> {
    let target = records.iter().find(|r| r.id() == id)?;
    let mut group: Vec<T> = records
        .iter()
        .filter(|r| r.same_group(target))
        .cloned()
        .collect();

    let pos = group.iter().position(|r| r.id() == id)?;
    let neighbour = match direction {
        Direction::Up if pos > 0 => pos - 1,
        Direction::Down if pos + 1 < group.len() => pos + 1,
        _ => return Some(Vec::new()),
    };

    let mut orders: Vec<i32> = group.iter().map(|r| r.order()).collect();
    orders.sort_unstable();
    orders.dedup();
    let renumber = orders.len() != group.len();
    if renumber {
        for (i, record) in group.iter_mut().enumerate() {
            record.set_order(i as i32);
        }
    }

    let a = group[pos].order();
    let b = group[neighbour].order();
    group[pos].set_order(b);
    group[neighbour].set_order(a);

    if renumber {
        return Some(group);
    }
    Some(vec![group[pos].clone(), group[neighbour].clone()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HistoryKind;

    fn history(id: i64, kind: HistoryKind, order: i32) -> HistoryEntry {
        HistoryEntry {
            id,
            year: 2000,
            month: 4,
            content: format!("row {id}"),
            kind,
            order,
        }
    }

    fn qualification(id: i64, order: i32) -> QualificationEntry {
        QualificationEntry {
            id,
            year: 2010,
            month: 1,
            content: format!("q{id}"),
            order,
        }
    }

    #[test]
    fn test_move_swaps_with_neighbour_in_group() {
        let rows = vec![
            history(1, HistoryKind::Education, 0),
            history(2, HistoryKind::Work, 0),
            history(3, HistoryKind::Education, 1),
            history(4, HistoryKind::Work, 1),
        ];
        let changed = plan_move(&rows, 3, Direction::Up).unwrap();
        assert_eq!(changed.len(), 2);
        let moved = changed.iter().find(|r| r.id == 3).unwrap();
        let other = changed.iter().find(|r| r.id == 1).unwrap();
        assert_eq!((moved.order, other.order), (0, 1));
    }

    #[test]
    fn test_move_at_group_edge_is_noop() {
        let rows = vec![qualification(1, 0), qualification(2, 1)];
        assert!(plan_move(&rows, 1, Direction::Up).unwrap().is_empty());
        assert!(plan_move(&rows, 2, Direction::Down).unwrap().is_empty());
        assert!(plan_move(&rows, 9, Direction::Down).is_none());
    }

    #[test]
    fn test_move_renumbers_colliding_orders() {
        let rows = vec![qualification(1, 0), qualification(2, 0), qualification(3, 0)];
        let changed = plan_move(&rows, 3, Direction::Up).unwrap();
        let mut orders: Vec<(i64, i32)> = changed.iter().map(|r| (r.id, r.order)).collect();
        orders.sort();
        assert_eq!(orders, vec![(1, 0), (2, 2), (3, 1)]);
    }

    #[test]
    fn test_next_order_follows_group_maximum() {
        let rows = vec![
            history(1, HistoryKind::Education, 4),
            history(2, HistoryKind::Work, 0),
        ];
        assert_eq!(next_order(&rows, &history(0, HistoryKind::Education, 0)), 5);
        assert_eq!(next_order(&rows, &history(0, HistoryKind::Work, 0)), 1);
        assert_eq!(next_order(&[], &qualification(0, 0)), 0);
    }
}

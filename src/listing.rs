//! Ordering and grouping of subprocesses for display.
//!
//! All sorts are stable: subprocesses sharing an `order` keep the sequence the
//! server returned them in.

use crate::models::{Process, SubProcess};

/// Sort one process's subprocesses by effective order.
pub fn sort_by_order(items: &mut [SubProcess]) {
    items.sort_by_key(SubProcess::effective_order);
}

/// Sort a flat collection by `(process_id, order)`.
pub fn sort_for_grouping(items: &mut [SubProcess]) {
    items.sort_by_key(|s| (s.process_id, s.effective_order()));
}

/// Subprocesses of one process, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessGroup {
    pub process_id: i64,
    pub items: Vec<SubProcess>,
}

impl ProcessGroup {
    /// Display name for the group's process.
    pub fn process_name<'a>(&self, processes: &'a [Process]) -> &'a str {
        processes
            .iter()
            .find(|p| p.id == self.process_id)
            .map(|p| p.name.as_str())
            .unwrap_or("Unknown process")
    }
}

/// Group by `process_id`, sections in order of first appearance.
///
/// Each item lands in exactly one group and keeps its relative position.
pub fn group_by_process(items: &[SubProcess]) -> Vec<ProcessGroup> {
    let mut groups: Vec<ProcessGroup> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|g| g.process_id == item.process_id) {
            Some(group) => group.items.push(item.clone()),
            None => groups.push(ProcessGroup {
                process_id: item.process_id,
                items: vec![item.clone()],
            }),
        }
    }
    groups
}

/// Direction of a one-step reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderMove {
    Up,
    Down,
}

/// Order after moving one step, or `None` if it would go below 0.
///
/// Siblings are not renumbered; two subprocesses may end up sharing a value.
pub fn moved_order(current: Option<i32>, direction: OrderMove) -> Option<i32> {
    let current = current.unwrap_or(0);
    let next = match direction {
        OrderMove::Up => current.checked_sub(1)?,
        OrderMove::Down => current.checked_add(1)?,
    };
    (next >= 0).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(id: i64, process_id: i64, order: Option<i32>) -> SubProcess {
        SubProcess {
            id,
            name: format!("sub-{id}"),
            process_id,
            order,
            ..Default::default()
        }
    }

    fn ids(items: &[SubProcess]) -> Vec<i64> {
        items.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_missing_order_sorts_as_zero() {
        let mut items = vec![sub(1, 1, Some(2)), sub(2, 1, None), sub(3, 1, Some(1))];
        sort_by_order(&mut items);
        assert_eq!(ids(&items), vec![2, 3, 1]);
    }

    #[test]
    fn test_ties_keep_server_order() {
        let mut items = vec![sub(5, 1, Some(1)), sub(3, 1, Some(0)), sub(4, 1, Some(1)), sub(1, 1, None)];
        sort_by_order(&mut items);
        assert_eq!(ids(&items), vec![3, 1, 5, 4]);
    }

    #[test]
    fn test_sort_for_grouping() {
        let mut items = vec![
            sub(1, 2, Some(1)),
            sub(2, 1, Some(3)),
            sub(3, 2, Some(0)),
            sub(4, 1, None),
            sub(5, 1, Some(3)),
        ];
        sort_for_grouping(&mut items);
        assert_eq!(ids(&items), vec![4, 2, 5, 3, 1]);
    }

    #[test]
    fn test_group_preserves_order_and_items() {
        let mut items = vec![
            sub(1, 7, Some(2)),
            sub(2, 3, Some(1)),
            sub(3, 7, Some(1)),
            sub(4, 3, Some(1)),
            sub(5, 9, None),
            sub(6, 7, Some(2)),
        ];
        sort_for_grouping(&mut items);
        let groups = group_by_process(&items);

        assert_eq!(groups.iter().map(|g| g.process_id).collect::<Vec<_>>(), vec![3, 7, 9]);
        assert_eq!(ids(&groups[0].items), vec![2, 4]);
        assert_eq!(ids(&groups[1].items), vec![3, 1, 6]);
        assert_eq!(ids(&groups[2].items), vec![5]);

        let mut all: Vec<i64> = groups.iter().flat_map(|g| ids(&g.items)).collect();
        all.sort();
        assert_eq!(all, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_group_uses_first_appearance_not_key_order() {
        let items = vec![sub(1, 9, None), sub(2, 2, None), sub(3, 9, None)];
        let groups = group_by_process(&items);
        assert_eq!(groups.iter().map(|g| g.process_id).collect::<Vec<_>>(), vec![9, 2]);
        assert_eq!(ids(&groups[0].items), vec![1, 3]);
    }

    #[test]
    fn test_group_empty() {
        assert!(group_by_process(&[]).is_empty());
    }

    #[test]
    fn test_group_process_name() {
        let processes = vec![Process {
            id: 3,
            name: "Payroll".to_string(),
            ..Default::default()
        }];
        let groups = group_by_process(&[sub(1, 3, None), sub(2, 4, None)]);
        assert_eq!(groups[0].process_name(&processes), "Payroll");
        assert_eq!(groups[1].process_name(&processes), "Unknown process");
    }

    #[test]
    fn test_moved_order() {
        assert_eq!(moved_order(Some(2), OrderMove::Up), Some(1));
        assert_eq!(moved_order(Some(2), OrderMove::Down), Some(3));
        assert_eq!(moved_order(None, OrderMove::Down), Some(1));
        assert_eq!(moved_order(Some(0), OrderMove::Up), None);
        assert_eq!(moved_order(None, OrderMove::Up), None);
        assert_eq!(moved_order(Some(i32::MAX), OrderMove::Down), None);
    }
}

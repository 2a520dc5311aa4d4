//! Dependency graph validation.
//!
//! Tasks are nodes; each entry in `dependencies` is an edge from the dependent
//! task to its dependency. A batch is valid when every edge lands on a task of
//! the same batch and the graph has no cycle.

use std::collections::{HashMap, HashSet};

use crate::domain::Task;
use crate::error::{RankError, Result};

/// Run every graph check, references first.
pub fn validate(tasks: &[Task]) -> Result<()> {
    validate_references(tasks)?;
    detect_cycle(tasks)
}

/// Check that every dependency id names a task in the batch.
///
/// Reports the first offending (task, dependency) pair in input order.
pub fn validate_references(tasks: &[Task]) -> Result<()> {
    let ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

    for task in tasks {
        if let Some(missing) = task.dependencies.iter().find(|d| !ids.contains(d.as_str())) {
            return Err(RankError::ReferentialIntegrity {
                task: task.id.clone(),
                dependency: missing.clone(),
            });
        }
    }

    Ok(())
}

/// Find the first cycle reachable from any task, walking tasks in input order.
///
/// Iterative depth-first search. The frame stack doubles as the current path:
/// each frame is `(node, next edge to follow)`. Nodes whose reachable subgraph
/// has been fully explored are marked completed and never re-entered, which
/// cannot hide a cycle since any cycle through them would already have been
/// reported.
///
/// Dependencies naming unknown tasks are skipped; run `validate_references`
/// first to reject them.
pub fn detect_cycle(tasks: &[Task]) -> Result<()> {
    let index: HashMap<&str, usize> = tasks.iter().enumerate().map(|(i, t)| (t.id.as_str(), i)).collect();
    let edges: Vec<Vec<usize>> = tasks
        .iter()
        .map(|t| {
            t.dependencies
                .iter()
                .filter_map(|d| index.get(d.as_str()).copied())
                .collect()
        })
        .collect();

    let mut completed = vec![false; tasks.len()];
    let mut on_path = vec![false; tasks.len()];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..tasks.len() {
        if completed[start] {
            continue;
        }

        on_path[start] = true;
        stack.push((start, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;

            match edges[node].get(next) {
                Some(&dep) => {
                    frame.1 += 1;

                    if on_path[dep] {
                        return Err(cycle_error(tasks, &stack, dep));
                    }
                    if !completed[dep] {
                        on_path[dep] = true;
                        stack.push((dep, 0));
                    }
                }
                None => {
                    stack.pop();
                    on_path[node] = false;
                    completed[node] = true;
                }
            }
        }
    }

    Ok(())
}

/// Build the error for a back edge into `repeated`: the path from `repeated`
/// down the stack and back to `repeated`.
fn cycle_error(tasks: &[Task], stack: &[(usize, usize)], repeated: usize) -> RankError {
    let from = stack.iter().position(|&(n, _)| n == repeated).unwrap_or_default();
    let mut path: Vec<String> = stack[from..].iter().map(|&(n, _)| tasks[n].id.clone()).collect();
    path.push(tasks[repeated].id.clone());

    log::debug!("Dependency cycle found: {}", path.join(" -> "));
    RankError::CyclicDependency { path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: &str, deps: &[&str]) -> Task {
        Task::new(id, id, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).with_dependencies(deps.iter().copied())
    }

    /// True when `path` closes on itself and every hop is a real edge.
    fn is_cycle(tasks: &[Task], path: &[String]) -> bool {
        if path.len() < 2 || path.first() != path.last() {
            return false;
        }
        path.windows(2).all(|hop| {
            tasks
                .iter()
                .find(|t| t.id == hop[0])
                .is_some_and(|t| t.dependencies.contains(&hop[1]))
        })
    }

    fn cycle_path(result: Result<()>) -> Vec<String> {
        match result {
            Err(RankError::CyclicDependency { path }) => path,
            other => panic!("Expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_no_cycle_passes() {
        let tasks = vec![task("0", &["1"]), task("1", &[]), task("2", &["1"])];
        assert!(validate(&tasks).is_ok());
    }

    #[test]
    fn test_empty_batch() {
        assert!(validate(&[]).is_ok());
    }

    #[test]
    fn test_two_node_cycle() {
        let tasks = vec![task("0", &["1"]), task("1", &["0"])];
        let path = cycle_path(detect_cycle(&tasks));
        assert_eq!(path, vec!["0", "1", "0"]);
        assert!(is_cycle(&tasks, &path));
    }

    #[test]
    fn test_three_node_cycle() {
        let tasks = vec![task("a", &["b"]), task("b", &["c"]), task("c", &["a"])];
        let path = cycle_path(detect_cycle(&tasks));
        assert_eq!(path.len(), 4);
        assert!(is_cycle(&tasks, &path));
    }

    #[test]
    fn test_self_dependency() {
        let tasks = vec![task("a", &["a"])];
        assert_eq!(cycle_path(detect_cycle(&tasks)), vec!["a", "a"]);
    }

    #[test]
    fn test_cycle_path_starts_at_repeated_node() {
        // x leads into the a <-> b loop but is not part of it
        let tasks = vec![task("x", &["a"]), task("a", &["b"]), task("b", &["a"])];
        let path = cycle_path(detect_cycle(&tasks));
        assert_eq!(path, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let tasks = vec![
            task("top", &["left", "right"]),
            task("left", &["bottom"]),
            task("right", &["bottom"]),
            task("bottom", &[]),
        ];
        assert!(detect_cycle(&tasks).is_ok());
    }

    #[test]
    fn test_completed_nodes_do_not_hide_cycle() {
        // "leaf" completes first; the cycle sits behind it in a later start node
        let tasks = vec![
            task("leaf", &[]),
            task("a", &["leaf", "b"]),
            task("b", &["leaf", "c"]),
            task("c", &["a"]),
        ];
        let path = cycle_path(detect_cycle(&tasks));
        assert!(is_cycle(&tasks, &path));
    }

    #[test]
    fn test_long_chain_without_recursion() {
        let ids: Vec<String> = (0..10_000).map(|i| i.to_string()).collect();
        let tasks: Vec<Task> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let deps: Vec<&str> = ids.get(i + 1).map(|d| vec![d.as_str()]).unwrap_or_default();
                task(id, &deps)
            })
            .collect();
        assert!(detect_cycle(&tasks).is_ok());
    }

    #[test]
    fn test_missing_dependency() {
        let tasks = vec![task("0", &["1"]), task("1", &["7"])];
        match validate_references(&tasks) {
            Err(RankError::ReferentialIntegrity { task, dependency }) => {
                assert_eq!(task, "1");
                assert_eq!(dependency, "7");
            }
            other => panic!("Expected referential integrity error, got {:?}", other),
        }
    }

    #[test]
    fn test_references_checked_before_cycles() {
        let tasks = vec![task("a", &["b"]), task("b", &["a", "ghost"])];
        assert!(matches!(validate(&tasks), Err(RankError::ReferentialIntegrity { .. })));
    }

    #[test]
    fn test_validate_does_not_mutate() {
        let tasks = vec![task("a", &["b"]), task("b", &[])];
        let before = tasks.clone();
        validate(&tasks).unwrap();
        assert_eq!(tasks, before);
    }
}

//! Grid searches and their visualization hook.
//!
//! [`find_path`] is an A* search with a Manhattan heuristic and uniform step cost. [`explore`] is a
//! breadth-first flood of everything reachable from a cell. Both only ever write to the level's
//! overlay, and both report their progress to a [`PathObserver`] so a front-end can animate them.

use std::{
    cmp::Reverse,
    collections::{BTreeSet, BinaryHeap, HashMap, VecDeque},
};

use tracing::{debug, info};

use crate::{level::Level, types::Position};

/// Cells from start to goal, both inclusive, in walking order.
pub type Path = Vec<Position>;

/// Receives one notification per cell added to the overlay during a search.
///
/// Searches run to completion in a single call, so this is the only point at which a front-end
/// gets to see intermediate states. Implementations usually redraw the level and pause briefly;
/// they only get shared access, and cannot alter the search.
pub trait PathObserver {
    /// Called after `level`'s overlay gained a cell.
    fn on_step(&mut self, level: &Level);
}

/// Observer that ignores every notification, for headless searches.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl PathObserver for NoopObserver {
    fn on_step(&mut self, _level: &Level) {}
}

/// Frontier entry.
///
/// Entries compare by priority first and by insertion sequence second, so extraction is stable:
/// among equal priorities the earliest pushed leaves first. The remaining fields never decide an
/// ordering because the sequence number is unique.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    /// Cost so far plus the heuristic estimate.
    ///
    /// The start cell is the exception: it is queued with priority 1 regardless of its distance
    /// to the goal.
    priority: u32,
    /// Push counter used as a tie breaker.
    sequence: u64,
    /// Cost so far when the entry was pushed.
    ///
    /// A cell can be queued more than once when a cheaper route to it turns up later. Comparing
    /// this value against the best known cost tells whether the entry is still current.
    cost: u32,
    /// The cell itself.
    position: Position,
}

/// Min-priority queue with first-in-first-out ties.
///
/// [`BinaryHeap`] is a max-heap; wrapping every entry in [`Reverse`] turns it into a min-heap over
/// the [`Candidate`] ordering.
#[derive(Debug, Default)]
struct Frontier {
    /// Reversed entries, turning the max-heap into a min-heap.
    heap: BinaryHeap<Reverse<Candidate>>,
    /// Next insertion sequence number.
    next_sequence: u64,
}

impl Frontier {
    /// Queues a cell.
    ///
    /// Every call takes the next sequence number, so a later push loses ties against an earlier
    /// one with the same priority.
    fn push(&mut self, position: Position, cost: u32, priority: u32) {
        self.heap.push(Reverse(Candidate {
            priority,
            sequence: self.next_sequence,
            cost,
            position,
        }));
        self.next_sequence = self.next_sequence.wrapping_add(1);
    }

    /// Removes the entry with the lowest priority, the oldest one among equals.
    fn pop(&mut self) -> Option<Candidate> {
        self.heap.pop().map(|Reverse(candidate)| candidate)
    }
}

/// Finds a least-cost path from `start` to `goal` over walkable cells.
///
/// Neighbours are expanded right, left, up, down, and the frontier releases equal priorities in
/// insertion order, so the path returned for a given level is always the same. The start cell is
/// queued with priority 1. A frontier entry whose cost has since been improved is skipped.
///
/// On success the overlay is rebuilt from the path, one cell at a time, notifying `observer` after
/// each cell. Returns [`None`] when the goal cannot be reached; the overlay is left empty then.
///
/// The start cell itself does not need to be walkable, but the goal does, since it is only ever
/// reached as a neighbour. Gameplay state (tiles and the player) is never touched.
pub fn find_path(
    level: &mut Level,
    start: Position,
    goal: Position,
    observer: &mut dyn PathObserver,
) -> Option<Path> {
    level.clear_overlay();

    let mut frontier = Frontier::default();
    let mut came_from = HashMap::from([(start, start)]);
    let mut cost_so_far = HashMap::from([(start, 0_u32)]);
    frontier.push(start, 0, 1);

    while let Some(current) = frontier.pop() {
        if current.position == goal {
            let path = reconstruct(&came_from, start, goal);
            debug!(%start, %goal, length = path.len(), "path found");
            trace_path(level, &path, observer);
            return Some(path);
        }

        // A cheaper route to this cell was queued after this entry; that one was or will be
        // expanded instead.
        if cost_so_far
            .get(&current.position)
            .is_some_and(|best| *best < current.cost)
        {
            continue;
        }

        // Every step costs the same, so all neighbours share one tentative cost.
        let new_cost = current.cost.saturating_add(1);
        for next in level.walkable_neighbours(current.position) {
            let improves = cost_so_far.get(&next).is_none_or(|known| new_cost < *known);
            if improves {
                let _ = cost_so_far.insert(next, new_cost);
                let priority = new_cost.saturating_add(goal.manhattan(next));
                frontier.push(next, new_cost, priority);
                let _ = came_from.insert(next, current.position);
            }
        }
    }

    info!(%start, %goal, "goal unreachable");
    None
}

/// Walks predecessor links back from the goal and returns the path in walking order.
///
/// The start is its own predecessor, which ends the walk. A missing link also ends it, although
/// every cell reached by the search has one.
fn reconstruct(came_from: &HashMap<Position, Position>, start: Position, goal: Position) -> Path {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        let Some(previous) = came_from.get(&current) else {
            break;
        };
        current = *previous;
        path.push(current);
    }
    path.reverse();
    path
}

/// Adds each path cell to the overlay in order, notifying the observer after each one.
fn trace_path(level: &mut Level, path: &[Position], observer: &mut dyn PathObserver) {
    for position in path {
        let _ = level.mark(*position);
        observer.on_step(level);
    }
}

/// Floods every cell reachable from `start`, breadth first.
///
/// The start cell is part of the result even when it is not walkable itself. The overlay is reset
/// and then gains each cell as it is discovered, with one observer notification per newly
/// discovered cell after the start.
///
/// Closed doors stop the flood like walls do; opening them is left to the player.
pub fn explore(
    level: &mut Level,
    start: Position,
    observer: &mut dyn PathObserver,
) -> BTreeSet<Position> {
    level.clear_overlay();
    let _ = level.mark(start);

    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        // Collected first: marking needs the level mutably while the neighbour iterator borrows it.
        let discovered: Vec<Position> = level
            .walkable_neighbours(current)
            .filter(|next| !visited.contains(next))
            .collect();

        for next in discovered {
            let _ = visited.insert(next);
            queue.push_back(next);
            let _ = level.mark(next);
            observer.on_step(level);
        }
    }

    debug!(%start, reachable = visited.len(), "exploration finished");
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{file_loader::load_level, types::Tile};

    /// Counts notifications and remembers the overlay size seen at each one.
    #[derive(Default)]
    struct RecordingObserver {
        /// Overlay sizes, one per notification.
        overlay_sizes: Vec<usize>,
    }

    impl PathObserver for RecordingObserver {
        fn on_step(&mut self, level: &Level) {
            self.overlay_sizes.push(level.overlay().len());
        }
    }

    /// Five by five level: a wall ring around a three by three floor.
    fn create_bordered_room() -> Level {
        load_level("#####\n#P..#\n#...#\n#...#\n#####").expect("room should load")
    }

    /// Asserts that consecutive path cells are adjacent and walkable.
    fn assert_walkable_chain(level: &Level, path: &[Position]) {
        for pair in path.windows(2) {
            if let [from, to] = pair {
                assert!(from.is_adjacent(*to), "{from} and {to} are not adjacent");
            }
        }
        for position in path {
            assert!(level.can_walk(*position), "{position} is not walkable");
        }
    }

    #[test]
    fn test_find_path_bordered_room_expected_cells() {
        let mut level = create_bordered_room();

        let path = find_path(
            &mut level,
            Position::new(1, 1),
            Position::new(3, 3),
            &mut NoopObserver,
        )
        .expect("goal should be reachable");

        assert_eq!(
            path,
            vec![
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(3, 1),
                Position::new(3, 2),
                Position::new(3, 3),
            ]
        );
    }

    #[test]
    fn test_find_path_open_floor_is_manhattan_length() {
        let row = ".".repeat(12);
        let mut source = vec![row.clone(); 9];
        if let Some(first) = source.first_mut() {
            first.replace_range(0..1, "P");
        }
        let mut level = load_level(&source.join("\n")).expect("open floor should load");

        for (start, goal) in [
            (Position::new(0, 0), Position::new(11, 8)),
            (Position::new(10, 2), Position::new(1, 7)),
            (Position::new(5, 5), Position::new(5, 0)),
            (Position::new(4, 4), Position::new(4, 4)),
        ] {
            let path = find_path(&mut level, start, goal, &mut NoopObserver)
                .expect("open floor goal should be reachable");

            let expected = usize::try_from(start.manhattan(goal)).expect("distance fits") + 1;
            assert_eq!(path.len(), expected, "path {start} -> {goal}");
            assert_eq!(path.first(), Some(&start));
            assert_eq!(path.last(), Some(&goal));
            assert_walkable_chain(&level, &path);
        }
    }

    #[test]
    fn test_find_path_routes_around_walls() {
        let mut level = load_level(
            "#######\n\
             #P#...#\n\
             #.#.#.#\n\
             #...#.#\n\
             #######",
        )
        .expect("maze should load");

        let path = find_path(
            &mut level,
            Position::new(1, 1),
            Position::new(5, 3),
            &mut NoopObserver,
        )
        .expect("goal should be reachable");

        assert_eq!(path.len(), 11);
        assert_walkable_chain(&level, &path);
    }

    #[test]
    fn test_find_path_skips_superseded_frontier_entries() {
        // (3,4) is first queued at cost 5 from above, then improved to cost 3 from the right
        // before its first entry leaves the frontier.
        let mut level = load_level(
            "#######\n#..##.#\n#.#...#\n#...#P#\n#.#...#\n#######",
        )
        .expect("map should load");
        let mut observer = RecordingObserver::default();

        let path = find_path(
            &mut level,
            Position::new(5, 3),
            Position::new(2, 1),
            &mut observer,
        )
        .expect("goal should be reachable");

        assert_eq!(
            path,
            vec![
                Position::new(5, 3),
                Position::new(5, 2),
                Position::new(4, 2),
                Position::new(3, 2),
                Position::new(3, 3),
                Position::new(2, 3),
                Position::new(1, 3),
                Position::new(1, 2),
                Position::new(1, 1),
                Position::new(2, 1),
            ]
        );
        assert_walkable_chain(&level, &path);
        assert_eq!(observer.overlay_sizes.len(), path.len());
    }

    #[test]
    fn test_find_path_enclosed_goal_is_none() {
        let mut level = load_level("#######\n#P.#.##\n#..####\n#######").expect("map should load");

        let path = find_path(
            &mut level,
            Position::new(1, 1),
            Position::new(4, 1),
            &mut NoopObserver,
        );

        assert_eq!(path, None);
        assert!(level.overlay().is_empty());
    }

    #[test]
    fn test_find_path_closed_door_blocks_until_opened() {
        let mut level = load_level("######\n#P.|.#\n######").expect("map should load");
        let start = Position::new(1, 1);
        let goal = Position::new(4, 1);

        assert_eq!(find_path(&mut level, start, goal, &mut NoopObserver), None);

        assert!(level.set_tile(Position::new(3, 1), Tile::OpenDoor));
        let path = find_path(&mut level, start, goal, &mut NoopObserver)
            .expect("open door should let the search through");
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_find_path_goal_outside_grid_is_none() {
        let mut level = create_bordered_room();

        let path = find_path(
            &mut level,
            Position::new(1, 1),
            Position::new(40, -3),
            &mut NoopObserver,
        );

        assert_eq!(path, None);
    }

    #[test]
    fn test_find_path_start_equals_goal() {
        let mut level = create_bordered_room();

        let path = find_path(
            &mut level,
            Position::new(2, 2),
            Position::new(2, 2),
            &mut NoopObserver,
        );

        assert_eq!(path, Some(vec![Position::new(2, 2)]));
    }

    #[test]
    fn test_find_path_leaves_gameplay_state_untouched() {
        let mut level = create_bordered_room();
        let rows_before = level.rows().to_vec();
        let player_before = level.player();

        let _ = find_path(
            &mut level,
            Position::new(1, 1),
            Position::new(3, 2),
            &mut NoopObserver,
        );

        assert_eq!(level.rows(), rows_before.as_slice());
        assert_eq!(level.player(), player_before);
    }

    #[test]
    fn test_find_path_notifies_once_per_path_cell() {
        let mut level = create_bordered_room();
        let mut observer = RecordingObserver::default();

        let path = find_path(
            &mut level,
            Position::new(1, 1),
            Position::new(3, 3),
            &mut observer,
        )
        .expect("goal should be reachable");

        assert_eq!(observer.overlay_sizes, vec![1, 2, 3, 4, 5]);
        let overlay: Vec<Position> = level.overlay().iter().copied().collect();
        let mut expected = path;
        expected.sort();
        assert_eq!(overlay, expected);
    }

    #[test]
    fn test_find_path_clears_previous_overlay() {
        let mut level = create_bordered_room();
        let _ = find_path(
            &mut level,
            Position::new(1, 1),
            Position::new(3, 3),
            &mut NoopObserver,
        );

        let _ = find_path(
            &mut level,
            Position::new(1, 1),
            Position::new(2, 1),
            &mut NoopObserver,
        );

        assert_eq!(level.overlay().len(), 2);
    }

    #[test]
    fn test_frontier_releases_ties_in_insertion_order() {
        let mut frontier = Frontier::default();
        frontier.push(Position::new(0, 0), 1, 4);
        frontier.push(Position::new(1, 0), 1, 3);
        frontier.push(Position::new(2, 0), 1, 4);
        frontier.push(Position::new(3, 0), 1, 3);

        let order: Vec<Position> = std::iter::from_fn(|| frontier.pop())
            .map(|candidate| candidate.position)
            .collect();

        assert_eq!(
            order,
            vec![
                Position::new(1, 0),
                Position::new(3, 0),
                Position::new(0, 0),
                Position::new(2, 0),
            ]
        );
    }

    #[test]
    fn test_explore_reaches_connected_region_only() {
        let mut level = load_level("#######\n#P.#..#\n#..#..#\n#######").expect("map should load");
        let mut observer = RecordingObserver::default();

        let reachable = explore(&mut level, Position::new(1, 1), &mut observer);

        let expected: BTreeSet<Position> = [
            Position::new(1, 1),
            Position::new(2, 1),
            Position::new(1, 2),
            Position::new(2, 2),
        ]
        .into_iter()
        .collect();
        assert_eq!(reachable, expected);
        assert_eq!(level.overlay(), &expected);
        assert_eq!(observer.overlay_sizes, vec![2, 3, 4]);
    }

    #[test]
    fn test_explore_stops_at_closed_doors() {
        let mut level = load_level("#######\n#.P|..#\n#######").expect("map should load");

        let reachable = explore(&mut level, Position::new(2, 1), &mut NoopObserver);

        let expected: BTreeSet<Position> = [Position::new(1, 1), Position::new(2, 1)]
            .into_iter()
            .collect();
        assert_eq!(reachable, expected);
        assert!(!reachable.contains(&Position::new(3, 1)));
        assert!(!reachable.contains(&Position::new(4, 1)));
    }
}

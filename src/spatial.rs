//! Axis-aligned bounding-box queries in pixel space.
//!
//! Overlap is strict: boxes that only share an edge do not collide, so the
//! player can slide flush along a wall.

use bracket_geometry::prelude::Rect;

pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x1 < b.x2 && a.x2 > b.x1 && a.y1 < b.y2 && a.y2 > b.y1
}

/// True when `candidate` intersects any obstacle.
pub fn blocked(candidate: &Rect, obstacles: &[Rect]) -> bool {
    obstacles.iter().any(|obstacle| overlaps(candidate, obstacle))
}

/// First item in roster order whose box intersects `candidate`.
pub fn first_overlap<'a, T, I>(candidate: &Rect, roster: I) -> Option<T>
where
    I: IntoIterator<Item = (T, &'a Rect)>,
{
    roster
        .into_iter()
        .find(|(_, bounds)| overlaps(candidate, bounds))
        .map(|(item, _)| item)
}

/// The exit opens only when all three conditions hold at once.
pub fn exit_triggered(player: &Rect, exit: &Rect, boss_defeated: bool, has_key: bool) -> bool {
    boss_defeated && has_key && overlaps(player, exit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: i32, y: i32) -> Rect {
        Rect::with_size(x, y, 60, 60)
    }

    #[test]
    fn touching_edges_do_not_collide() {
        assert!(!overlaps(&cell(0, 0), &cell(60, 0)));
        assert!(!overlaps(&cell(0, 0), &cell(0, 60)));
        assert!(!overlaps(&cell(0, 0), &cell(60, 60)));
    }

    #[test]
    fn partial_overlap_collides_both_ways() {
        assert!(overlaps(&cell(0, 0), &cell(48, 12)));
        assert!(overlaps(&cell(48, 12), &cell(0, 0)));
        assert!(overlaps(&cell(0, 0), &cell(0, 0)));
    }

    #[test]
    fn blocked_checks_every_obstacle() {
        let walls = vec![cell(0, 0), cell(120, 0), cell(240, 0)];
        assert!(blocked(&cell(230, 10), &walls));
        assert!(!blocked(&cell(0, 60), &walls));
        assert!(!blocked(&cell(0, 0), &[]));
    }

    #[test]
    fn first_overlap_respects_roster_order() {
        let a = cell(0, 0);
        let b = cell(30, 0);
        let roster = vec![(7_u32, &a), (3_u32, &b)];
        assert_eq!(first_overlap(&cell(20, 0), roster.clone()), Some(7));
        assert_eq!(first_overlap(&cell(70, 0), roster.clone()), Some(3));
        assert_eq!(first_overlap(&cell(200, 0), roster), None);
    }

    #[test]
    fn exit_needs_boss_key_and_overlap() {
        let exit = cell(300, 300);
        assert!(!exit_triggered(&cell(0, 0), &exit, true, true));
        assert!(!exit_triggered(&cell(300, 300), &exit, false, true));
        assert!(!exit_triggered(&cell(300, 300), &exit, true, false));
        assert!(exit_triggered(&cell(300, 300), &exit, true, true));
        assert!(exit_triggered(&cell(252, 300), &exit, true, true));
    }
}

use crate::{BracketLayout, BracketTree, SlotId, Wing};
use kurbo::{Line, Point};

/// Right-angled line joining one slot to the slot it feeds.
///
/// ```text
///  child ──┐            segments[0]: child stub, at the child's center row
///          │            segments[1]: bus run, from child row to parent row
///          └── parent   segments[2]: parent stub, at the parent's center row
/// ```
///
/// Both feeders of a parent share the same bus x, so the two connectors of a
/// pair draw one vertical bus spanning child to child, split at the parent row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub child: SlotId,
    pub parent: SlotId,
    pub wing: Wing,
    pub segments: [Line; 3],
}

impl Connector {
    pub fn bus_x(&self) -> f64 {
        self.segments[1].p0.x
    }
}

/// Route every child → parent edge of the tree, round by round, in slot order.
///
/// The wing innermost slots feed the Final from opposite sides, so each gets
/// its own bus in the gap next to the Final.
pub fn route(tree: &BracketTree, layout: &BracketLayout) -> Vec<Connector> {
    let mut connectors = Vec::with_capacity(tree.slot_count().saturating_sub(1));

    for child in tree.slot_ids().filter(|id| id.round < tree.final_round()) {
        let parent = child.parent();
        let (Some(wing), Some(child_rect), Some(parent_rect)) =
            (tree.wing(child), layout.rect(child), layout.rect(parent))
        else {
            continue;
        };

        // Inward edge faces the Final; the parent is entered from its outward side.
        let (inward_x, outward_x) = match wing {
            Wing::Left => (child_rect.x1, parent_rect.x0),
            Wing::Right => (child_rect.x0, parent_rect.x1),
        };
        let bus_x = (inward_x + outward_x) / 2.0;
        let child_y = child_rect.center().y;
        let parent_y = parent_rect.center().y;

        connectors.push(Connector {
            child,
            parent,
            wing,
            segments: [
                Line::new(Point::new(inward_x, child_y), Point::new(bus_x, child_y)),
                Line::new(Point::new(bus_x, child_y), Point::new(bus_x, parent_y)),
                Line::new(Point::new(bus_x, parent_y), Point::new(outward_x, parent_y)),
            ],
        });
    }

    connectors
}

/// Flattened segment list in routing order.
pub fn segments(connectors: &[Connector]) -> Vec<Line> {
    connectors.iter().flat_map(|c| c.segments).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LayoutParams;

    fn routed(first_round: usize) -> (BracketTree, BracketLayout, Vec<Connector>) {
        let tree = BracketTree::empty(first_round).expect("valid");
        let layout = BracketLayout::compute(&tree, &LayoutParams::default());
        let connectors = route(&tree, &layout);
        (tree, layout, connectors)
    }

    #[test]
    fn test_one_connector_per_edge() {
        for n in [2, 4, 8, 16] {
            let (tree, _, connectors) = routed(n);
            assert_eq!(connectors.len(), tree.slot_count() - 1);
            assert_eq!(segments(&connectors).len(), 3 * (tree.slot_count() - 1));
        }
    }

    #[test]
    fn test_segments_form_a_continuous_staircase() {
        let (_, layout, connectors) = routed(8);
        for c in &connectors {
            let [stub, bus, entry] = c.segments;
            assert_eq!(stub.p1, bus.p0);
            assert_eq!(bus.p1, entry.p0);
            assert_eq!(stub.p0.y, stub.p1.y, "child stub is horizontal");
            assert_eq!(bus.p0.x, bus.p1.x, "bus is vertical");
            assert_eq!(entry.p0.y, entry.p1.y, "parent stub is horizontal");
            assert_eq!(stub.p0.y, layout.center(c.child).expect("child").y);
            assert_eq!(entry.p1.y, layout.center(c.parent).expect("parent").y);
        }
    }

    #[test]
    fn test_connectors_attach_to_facing_edges() {
        let (_, layout, connectors) = routed(8);
        for c in &connectors {
            let child = layout.rect(c.child).expect("child");
            let parent = layout.rect(c.parent).expect("parent");
            let [stub, _, entry] = c.segments;
            match c.wing {
                Wing::Left => {
                    assert_eq!(stub.p0.x, child.x1);
                    assert_eq!(entry.p1.x, parent.x0);
                    assert!(child.x1 < c.bus_x() && c.bus_x() < parent.x0);
                }
                Wing::Right => {
                    assert_eq!(stub.p0.x, child.x0);
                    assert_eq!(entry.p1.x, parent.x1);
                    assert!(parent.x1 < c.bus_x() && c.bus_x() < child.x0);
                }
            }
        }
    }

    #[test]
    fn test_pair_shares_bus_and_meets_at_parent_row() {
        let (tree, layout, connectors) = routed(8);
        for pair in connectors.chunks(2).filter(|p| p[0].parent.round < tree.final_round()) {
            let [a, b] = [&pair[0], &pair[1]];
            assert_eq!(a.parent, b.parent);
            assert_eq!(a.bus_x(), b.bus_x());
            let parent_y = layout.center(a.parent).expect("parent").y;
            assert_eq!(a.segments[1].p1.y, parent_y);
            assert_eq!(b.segments[1].p1.y, parent_y);
            let span = (a.segments[1].p0.y - b.segments[1].p0.y).abs();
            assert_eq!(span / 2.0, (a.segments[1].p0.y - parent_y).abs());
        }
    }

    #[test]
    fn test_bus_sits_between_columns() {
        let (_, layout, connectors) = routed(8);
        let first = &connectors[0];
        // Left R16 right edge 152, left QF left edge 176.
        assert_eq!(first.child, SlotId::new(0, 0));
        assert_eq!(first.bus_x(), 164.0);
        let into_final: Vec<&Connector> = connectors.iter().filter(|c| c.parent.round == 3).collect();
        assert_eq!(into_final.len(), 2);
        assert_eq!(into_final[0].bus_x(), layout.final_x() - 5.0);
        assert_eq!(into_final[1].bus_x(), layout.final_x() + 126.0 + 5.0);
    }

    #[test]
    fn test_wings_mirror_about_the_center_line() {
        let (tree, layout, connectors) = routed(16);
        let mid = layout.canvas().width / 2.0;
        let mirror = |p: Point| Point::new(2.0 * mid - p.x, p.y);
        for c in connectors.iter().filter(|c| c.wing == Wing::Left) {
            let len = tree.round(c.child.round).expect("round").len();
            let twin_child = SlotId::new(c.child.round, c.child.index + len / 2);
            let twin = connectors.iter().find(|t| t.child == twin_child).expect("twin");
            for (l, r) in c.segments.iter().zip(twin.segments.iter()) {
                assert_eq!(mirror(l.p0), r.p0);
                assert_eq!(mirror(l.p1), r.p1);
            }
        }
    }

    #[test]
    fn test_routing_is_deterministic() {
        let (tree, layout, connectors) = routed(8);
        assert_eq!(route(&tree, &layout), connectors);
    }
}

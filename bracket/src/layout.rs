use crate::{BracketError, BracketResult, BracketTree, SlotId, Wing};
use kurbo::{Point, Rect, Size};

// ---------------------------------------------------------------------------
// Layout parameters
// ---------------------------------------------------------------------------

/// Box dimensions and spacing, in layout units (pixels for a painter, scaled
/// down to cells by a terminal renderer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub box_width: f64,
    pub box_height: f64,
    /// Distance between the left edges of adjacent wing columns.
    pub column_spacing: f64,
    /// Vertical gap between first-round boxes of one wing.
    pub row_gap: f64,
    /// Clear gap between each wing's innermost box and the Final box.
    pub final_gap: f64,
    /// Top margin, and side margin when the canvas width is derived.
    pub margin: f64,
    /// Fixed canvas width. `None` derives the tightest symmetric width.
    pub canvas_width: Option<f64>,
}

impl Default for LayoutParams {
    /// The fixed 1050-wide bracket screen: 126×70 boxes, 150 between columns,
    /// 10 between the semifinals and the Final.
    fn default() -> Self {
        Self {
            box_width: 126.0,
            box_height: 70.0,
            column_spacing: 150.0,
            row_gap: 30.0,
            final_gap: 10.0,
            margin: 50.0,
            canvas_width: Some(1050.0),
        }
    }
}

impl LayoutParams {
    pub fn validate(&self) -> BracketResult<()> {
        let finite = [
            self.box_width,
            self.box_height,
            self.column_spacing,
            self.row_gap,
            self.final_gap,
            self.margin,
        ]
        .iter()
        .chain(self.canvas_width.iter())
        .all(|v| v.is_finite());
        if !finite {
            return Err(invalid("all dimensions must be finite"));
        }
        if self.box_width <= 0.0 || self.box_height <= 0.0 {
            return Err(invalid("box width and height must be positive"));
        }
        if self.column_spacing <= self.box_width {
            return Err(invalid("column spacing must exceed the box width"));
        }
        if self.row_gap < 0.0 || self.final_gap < 0.0 || self.margin < 0.0 {
            return Err(invalid("gaps and margin must not be negative"));
        }
        if self.canvas_width.is_some_and(|w| w <= 0.0) {
            return Err(invalid("canvas width must be positive"));
        }
        Ok(())
    }

    fn row_pitch(&self) -> f64 {
        self.box_height + self.row_gap
    }
}

fn invalid(msg: &str) -> BracketError {
    BracketError::InvalidLayoutParams(msg.to_string())
}

// ---------------------------------------------------------------------------
// BracketLayout — box rectangles for every slot
// ---------------------------------------------------------------------------

/// Box geometry for every slot of one bracket snapshot.
///
/// Columns, left → right:
///   first round (left wing) | … | semifinal (left) | Final | semifinal (right) | … | first round (right wing)
#[derive(Debug, Clone, PartialEq)]
pub struct BracketLayout {
    /// Rectangles per round, same shape as the tree's rounds.
    rects: Vec<Vec<Rect>>,
    canvas: Size,
    final_x: f64,
}

impl BracketLayout {
    /// Lay out a validated tree.
    ///
    /// Vertical centers are fixed for the first round of each wing (evenly
    /// spaced, both wings sharing the same rows) and every later slot sits at
    /// the midpoint of its two feeders:
    ///   center[r+1][k] = (center[r][2k] + center[r][2k+1]) / 2
    /// which also places the Final midway between the two wing semifinals.
    ///
    /// Columns are placed outward from the Final, which is centered on the
    /// canvas. Wing column `i` (0 = next to the Final) sits at
    ///   final_x ∓ (box_width + final_gap + i * column_spacing)
    ///
    /// Params are not re-checked here; see [`LayoutParams::validate`].
    pub fn compute(tree: &BracketTree, params: &LayoutParams) -> Self {
        let final_round = tree.final_round();
        let leaves_per_wing = tree.first_round_len() / 2;

        let half_span = column_offset(params, final_round.saturating_sub(1));
        let canvas_width = params
            .canvas_width
            .unwrap_or(2.0 * params.margin + 2.0 * half_span + params.box_width);
        let canvas_height = 2.0 * params.margin + leaves_per_wing as f64 * params.row_pitch()
            - params.row_gap;
        let final_x = canvas_width / 2.0 - params.box_width / 2.0;

        let mut centers: Vec<Vec<f64>> = Vec::with_capacity(tree.round_count());
        centers.push(
            (0..tree.first_round_len())
                .map(|i| {
                    let row = (i % leaves_per_wing) as f64;
                    params.margin + row * params.row_pitch() + params.box_height / 2.0
                })
                .collect(),
        );
        for round in 1..tree.round_count() {
            let prev = &centers[round - 1];
            let next = (0..prev.len() / 2)
                .map(|k| (prev[2 * k] + prev[2 * k + 1]) / 2.0)
                .collect();
            centers.push(next);
        }

        let rects = centers
            .iter()
            .enumerate()
            .map(|(round, row)| {
                row.iter()
                    .enumerate()
                    .map(|(index, &cy)| {
                        let x = match Wing::of(index, row.len()) {
                            None => final_x,
                            Some(wing) => {
                                let column = final_round - 1 - round;
                                final_x + wing.outward() * column_offset(params, column)
                            }
                        };
                        Rect::new(
                            x,
                            cy - params.box_height / 2.0,
                            x + params.box_width,
                            cy + params.box_height / 2.0,
                        )
                    })
                    .collect()
            })
            .collect();

        Self { rects, canvas: Size::new(canvas_width, canvas_height), final_x }
    }

    pub fn rect(&self, id: SlotId) -> Option<Rect> {
        self.rects.get(id.round)?.get(id.index).copied()
    }

    /// Box center; the connector router attaches lines at `center.y`.
    pub fn center(&self, id: SlotId) -> Option<Point> {
        self.rect(id).map(|r| r.center())
    }

    pub fn rounds(&self) -> &[Vec<Rect>] {
        &self.rects
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Left edge of the Final box.
    pub fn final_x(&self) -> f64 {
        self.final_x
    }

    /// Signed horizontal offset of a slot's column from the Final's column.
    pub fn column_x_offset(&self, id: SlotId) -> Option<f64> {
        self.rect(id).map(|r| r.x0 - self.final_x)
    }

    /// Smallest rectangle covering every box.
    pub fn bounds(&self) -> Rect {
        self.rects
            .iter()
            .flatten()
            .copied()
            .reduce(|acc, r| acc.union(r))
            .unwrap_or(Rect::ZERO)
    }
}

/// Distance from the Final's left edge to wing column `column` (0 = innermost).
fn column_offset(params: &LayoutParams, column: usize) -> f64 {
    params.box_width + params.final_gap + column as f64 * params.column_spacing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Match, TeamId};

    fn layout(first_round: usize) -> BracketLayout {
        let tree = BracketTree::empty(first_round).expect("valid");
        BracketLayout::compute(&tree, &LayoutParams::default())
    }

    fn center_y(layout: &BracketLayout, round: usize, index: usize) -> f64 {
        layout.center(SlotId::new(round, index)).expect("slot").y
    }

    #[test]
    fn test_default_params_reproduce_fixed_screen() {
        // 8 first-round slots: 4 per wing.
        let l = layout(8);
        assert_eq!(l.final_x(), 462.0);
        assert_eq!(l.rect(SlotId::new(3, 0)).map(|r| r.x0), Some(462.0));
        // Semifinals hug the Final with a 10 unit gap.
        assert_eq!(l.rect(SlotId::new(2, 0)).map(|r| r.x0), Some(326.0));
        assert_eq!(l.rect(SlotId::new(2, 1)).map(|r| r.x0), Some(598.0));
        assert_eq!(l.rect(SlotId::new(1, 0)).map(|r| r.x0), Some(176.0));
        assert_eq!(l.rect(SlotId::new(0, 0)).map(|r| r.x0), Some(26.0));
        assert_eq!(l.rect(SlotId::new(0, 7)).map(|r| r.x0), Some(898.0));
    }

    #[test]
    fn test_first_round_rows_are_evenly_spaced_per_wing() {
        let l = layout(8);
        let left: Vec<f64> = (0..4).map(|i| center_y(&l, 0, i)).collect();
        let right: Vec<f64> = (4..8).map(|i| center_y(&l, 0, i)).collect();
        assert_eq!(left, vec![85.0, 185.0, 285.0, 385.0]);
        assert_eq!(left, right);
        assert_eq!(l.rect(SlotId::new(0, 0)).map(|r| r.y0), Some(50.0));
    }

    #[test]
    fn test_parent_sits_at_midpoint_of_feeders() {
        for n in [2, 4, 8, 16, 32] {
            let tree = BracketTree::empty(n).expect("valid");
            let l = BracketLayout::compute(&tree, &LayoutParams::default());
            for id in tree.slot_ids().filter(|id| id.round > 0) {
                let [a, b] = id.feeders().expect("feeders");
                let expected = (l.center(a).expect("a").y + l.center(b).expect("b").y) / 2.0;
                assert_eq!(l.center(id).expect("parent").y, expected, "n={n} slot={id}");
            }
        }
    }

    #[test]
    fn test_final_is_centered_between_wings() {
        let l = layout(8);
        assert_eq!(center_y(&l, 3, 0), (center_y(&l, 2, 0) + center_y(&l, 2, 1)) / 2.0);
        assert_eq!(center_y(&l, 3, 0), 235.0);
        let f = l.rect(SlotId::new(3, 0)).expect("final");
        assert_eq!(f.center().x, l.canvas().width / 2.0);
    }

    #[test]
    fn test_wing_columns_mirror_each_other() {
        for n in [2, 4, 8, 16] {
            let tree = BracketTree::empty(n).expect("valid");
            let l = BracketLayout::compute(&tree, &LayoutParams { canvas_width: None, ..LayoutParams::default() });
            for round in 0..tree.final_round() {
                let len = tree.round(round).expect("round").len();
                for i in 0..len / 2 {
                    let left = l.column_x_offset(SlotId::new(round, i)).expect("left");
                    let right = l.column_x_offset(SlotId::new(round, len - 1 - i)).expect("right");
                    assert_eq!(left, -right, "n={n} round={round}");
                    assert!(left < 0.0);
                }
            }
        }
    }

    #[test]
    fn test_derived_canvas_is_tight_and_symmetric() {
        let params = LayoutParams { canvas_width: None, ..LayoutParams::default() };
        let tree = BracketTree::empty(8).expect("valid");
        let l = BracketLayout::compute(&tree, &params);
        let bounds = l.bounds();
        assert_eq!(bounds.x0, params.margin);
        assert_eq!(l.canvas().width - bounds.x1, params.margin);
        assert_eq!(bounds.y0, params.margin);
        assert_eq!(l.canvas().height - bounds.y1, params.margin);
    }

    #[test]
    fn test_two_slot_bracket_has_one_column_per_wing() {
        let l = layout(2);
        assert_eq!(center_y(&l, 0, 0), center_y(&l, 0, 1));
        assert_eq!(center_y(&l, 1, 0), center_y(&l, 0, 0));
        assert_eq!(l.column_x_offset(SlotId::new(0, 0)), Some(-136.0));
        assert_eq!(l.column_x_offset(SlotId::new(0, 1)), Some(136.0));
    }

    #[test]
    fn test_geometry_ignores_slot_contents() {
        let empty = BracketTree::empty(4).expect("valid");
        let mut rounds = empty.rounds().to_vec();
        rounds[0][2] = Some(Match::played(TeamId(5), TeamId(6), 4, 2));
        rounds[2][0] = Some(Match::new(Some(TeamId(5)), None));
        let filled = BracketTree::new(rounds).expect("valid");
        let params = LayoutParams::default();
        assert_eq!(
            BracketLayout::compute(&empty, &params),
            BracketLayout::compute(&filled, &params)
        );
    }

    #[test]
    fn test_compute_is_deterministic() {
        let tree = BracketTree::empty(16).expect("valid");
        let params = LayoutParams::default();
        assert_eq!(BracketLayout::compute(&tree, &params), BracketLayout::compute(&tree, &params));
    }

    #[test]
    fn test_validate_rejects_unusable_params() {
        assert!(LayoutParams::default().validate().is_ok());
        let bad = [
            LayoutParams { box_width: 0.0, ..LayoutParams::default() },
            LayoutParams { box_height: f64::NAN, ..LayoutParams::default() },
            LayoutParams { column_spacing: 100.0, ..LayoutParams::default() },
            LayoutParams { row_gap: -1.0, ..LayoutParams::default() },
            LayoutParams { canvas_width: Some(0.0), ..LayoutParams::default() },
        ];
        for params in bad {
            assert!(
                matches!(params.validate(), Err(BracketError::InvalidLayoutParams(_))),
                "{params:?}"
            );
        }
    }
}

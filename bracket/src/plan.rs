use crate::connector::{self, Connector};
use crate::{
    BracketLayout, BracketResult, BracketTree, LayoutParams, Match, Outcome, RoundKind,
    SlotHighlight, SlotId, TeamId, Wing, resolve,
};
use kurbo::{Line, Rect, Size};

/// Everything a renderer needs for one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotView<'a> {
    pub id: SlotId,
    pub kind: RoundKind,
    pub wing: Option<Wing>,
    pub rect: Rect,
    pub outcome: Outcome,
    pub highlight: SlotHighlight,
    /// The originating fixture, `None` for a TBD placeholder.
    pub fixture: Option<&'a Match>,
}

impl SlotView<'_> {
    /// Team that advances from this slot, if decided.
    pub fn winner(&self) -> Option<TeamId> {
        let fixture = self.fixture?;
        match self.outcome {
            Outcome::HomeAdvances => fixture.home,
            Outcome::AwayAdvances => fixture.away,
            Outcome::Undecided(_) => None,
        }
    }
}

/// Full derived view of one bracket snapshot: geometry, outcomes and connectors.
/// Rebuilt from scratch on every refresh; holds no state of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketPlan<'a> {
    pub slots: Vec<SlotView<'a>>,
    pub connectors: Vec<Connector>,
    pub canvas: Size,
}

impl<'a> BracketPlan<'a> {
    pub fn build(tree: &'a BracketTree, params: &LayoutParams) -> BracketResult<Self> {
        params.validate()?;
        let layout = BracketLayout::compute(tree, params);
        let connectors = connector::route(tree, &layout);

        let slots = tree
            .slot_ids()
            .filter_map(|id| {
                let rect = layout.rect(id)?;
                let fixture = tree.slot(id);
                let outcome = resolve(fixture);
                Some(SlotView {
                    id,
                    kind: tree.round_kind(id.round),
                    wing: tree.wing(id),
                    rect,
                    outcome,
                    highlight: outcome.highlight(),
                    fixture,
                })
            })
            .collect();

        Ok(Self { slots, connectors, canvas: layout.canvas() })
    }

    pub fn slot(&self, id: SlotId) -> Option<&SlotView<'a>> {
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn segments(&self) -> Vec<Line> {
        connector::segments(&self.connectors)
    }

    /// Winner of the Final, once it is decided.
    pub fn champion(&self) -> Option<TeamId> {
        self.slots.iter().find(|s| s.kind.is_final()).and_then(SlotView::winner)
    }

    pub fn unresolved_draws(&self) -> impl Iterator<Item = &SlotView<'a>> {
        self.slots.iter().filter(|s| s.outcome.is_unresolved_draw())
    }
}

//! Which control occupies a card's primary slot.
//!
//! A user's pick survives unrelated state churn; a pick that stops being
//! eligible falls back to the first eligible control, or to nothing.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "control", rename_all = "snake_case")]
pub enum Selection<C> {
    NoSelection,
    Selected(C),
}

impl<C> Default for Selection<C> {
    fn default() -> Self {
        Selection::NoSelection
    }
}

impl<C: Copy> Selection<C> {
    pub fn control(&self) -> Option<C> {
        match self {
            Selection::NoSelection => None,
            Selection::Selected(control) => Some(*control),
        }
    }
}

/// Next selection after an update tick or a user pick.
///
/// An explicit `user_choice` wins unconditionally: the shell only offers
/// eligible controls for picking. Otherwise a still-eligible previous
/// selection is kept and anything else resets to the first eligible control.
pub fn reconcile_active_control<C: Copy + PartialEq>(
    previous: Selection<C>,
    eligible: &[C],
    user_choice: Option<C>,
) -> Selection<C> {
    if let Some(choice) = user_choice {
        return Selection::Selected(choice);
    }
    match previous {
        Selection::Selected(control) if eligible.contains(&control) => previous,
        _ => eligible
            .first()
            .map_or(Selection::NoSelection, |first| Selection::Selected(*first)),
    }
}

/// Per-card selection state, kept together with the eligible set it was
/// last reconciled against so the two are always read as a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSelector<C> {
    eligible: Vec<C>,
    selection: Selection<C>,
}

impl<C> Default for ControlSelector<C> {
    fn default() -> Self {
        Self {
            eligible: Vec::new(),
            selection: Selection::NoSelection,
        }
    }
}

impl<C: Copy + PartialEq + std::fmt::Debug> ControlSelector<C> {
    /// Replace the eligible set and reconcile the selection against it.
    pub fn update(&mut self, eligible: Vec<C>) -> Selection<C> {
        let next = reconcile_active_control(self.selection, &eligible, None);
        if next != self.selection {
            tracing::debug!(from = ?self.selection, to = ?next, "active control reconciled");
        }
        self.eligible = eligible;
        self.selection = next;
        next
    }

    /// The user picked `control` from the other-controls row.
    pub fn select(&mut self, control: C) -> Selection<C> {
        let next = reconcile_active_control(self.selection, &self.eligible, Some(control));
        tracing::debug!(from = ?self.selection, to = ?next, "control selected");
        self.selection = next;
        next
    }

    pub fn selection(&self) -> Selection<C> {
        self.selection
    }

    pub fn active(&self) -> Option<C> {
        self.selection.control()
    }

    pub fn eligible(&self) -> &[C] {
        &self.eligible
    }

    /// Eligible controls other than the active one, in eligible order.
    pub fn others(&self) -> Vec<C> {
        self.eligible
            .iter()
            .copied()
            .filter(|control| Some(*control) != self.active())
            .collect()
    }
}

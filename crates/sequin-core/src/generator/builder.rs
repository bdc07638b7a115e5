//! Step selection and an in-memory layer for generators to write to

use crate::config::{DEFAULT_LEVEL, STEP_COUNT};

use super::PatternSink;

/// Which steps a generator may touch. Owned by the step-selection UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSelection {
    selected: [bool; STEP_COUNT],
}

impl Default for StepSelection {
    fn default() -> Self {
        Self {
            selected: [false; STEP_COUNT],
        }
    }
}

impl StepSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            selected: [true; STEP_COUNT],
        }
    }

    /// Select the given step indices; indices past capacity are ignored
    pub fn from_steps(steps: impl IntoIterator<Item = usize>) -> Self {
        let mut selection = Self::new();
        for step in steps {
            selection.select(step);
        }
        selection
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    pub fn select(&mut self, index: usize) {
        if let Some(s) = self.selected.get_mut(index) {
            *s = true;
        }
    }

    pub fn deselect(&mut self, index: usize) {
        if let Some(s) = self.selected.get_mut(index) {
            *s = false;
        }
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some(s) = self.selected.get_mut(index) {
            *s = !*s;
        }
    }

    pub fn select_all(&mut self) {
        self.selected = [true; STEP_COUNT];
    }

    pub fn clear(&mut self) {
        self.selected = [false; STEP_COUNT];
    }

    pub fn any(&self) -> bool {
        self.selected.iter().any(|&s| s)
    }

    pub fn count(&self) -> usize {
        self.selected.iter().filter(|&&s| s).count()
    }
}

/// One layer of step levels, with the baseline a generator session can revert to
#[derive(Debug, Clone, PartialEq)]
pub struct LayerBuilder {
    values: Vec<f32>,
    baseline: Vec<f32>,
    default_level: f32,
}

impl LayerBuilder {
    /// Layer holding `values`, which also become the revert baseline
    pub fn new(values: Vec<f32>) -> Self {
        Self::with_default(values, DEFAULT_LEVEL)
    }

    pub fn with_default(values: Vec<f32>, default_level: f32) -> Self {
        Self {
            baseline: values.clone(),
            values,
            default_level,
        }
    }

    /// Layer of `length` steps at the default level
    pub fn empty(length: usize) -> Self {
        Self::new(vec![DEFAULT_LEVEL; length.min(STEP_COUNT)])
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }

    /// Keep the current levels; later reverts return here
    pub fn commit(&mut self) {
        self.snapshot();
    }
}

impl PatternSink for LayerBuilder {
    fn length(&self) -> usize {
        self.values.len()
    }

    fn set_value(&mut self, index: usize, level: f32) {
        if let Some(v) = self.values.get_mut(index) {
            *v = level.clamp(0.0, 1.0);
        }
    }

    fn clear_value(&mut self, index: usize) {
        if let Some(v) = self.values.get_mut(index) {
            *v = self.default_level;
        }
    }

    fn snapshot(&mut self) {
        self.baseline.clone_from(&self.values);
    }

    fn revert(&mut self) {
        self.values.clone_from(&self.baseline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_edits() {
        let mut selection = StepSelection::from_steps([1, 3, 200]);
        assert!(selection.is_selected(1));
        assert!(!selection.is_selected(2));
        assert!(!selection.is_selected(200));
        assert_eq!(selection.count(), 2);

        selection.toggle(3);
        selection.toggle(4);
        selection.deselect(1);
        assert_eq!(selection.count(), 1);
        assert!(selection.is_selected(4));

        selection.clear();
        assert!(!selection.any());
        selection.select_all();
        assert_eq!(selection.count(), STEP_COUNT);
    }

    #[test]
    fn test_layer_clamps_and_ignores_out_of_range() {
        let mut layer = LayerBuilder::empty(4);
        layer.set_value(0, 1.5);
        layer.set_value(1, -0.2);
        layer.set_value(2, 0.25);
        layer.set_value(9, 0.5);
        assert_eq!(layer.values(), &[1.0, 0.0, 0.25, 0.0]);
    }

    #[test]
    fn test_layer_revert_and_commit() {
        let mut layer = LayerBuilder::with_default(vec![0.1, 0.2, 0.3], 0.5);
        layer.set_value(0, 0.9);
        layer.clear_value(2);
        assert_eq!(layer.values(), &[0.9, 0.2, 0.5]);
        layer.revert();
        assert_eq!(layer.values(), &[0.1, 0.2, 0.3]);

        layer.set_value(1, 1.0);
        layer.commit();
        layer.set_value(1, 0.0);
        layer.revert();
        assert_eq!(layer.into_values(), vec![0.1, 1.0, 0.3]);
    }
}

//! Init-layer generator: reset selected steps to the layer default

use super::{Generator, GeneratorMode, PatternSink, StepSelection};

pub struct InitLayerGenerator<'a> {
    sink: &'a mut dyn PatternSink,
    selected: &'a StepSelection,
}

impl<'a> InitLayerGenerator<'a> {
    pub fn new(sink: &'a mut dyn PatternSink, selected: &'a StepSelection) -> Self {
        Self { sink, selected }
    }
}

impl Generator for InitLayerGenerator<'_> {
    fn mode(&self) -> GeneratorMode {
        GeneratorMode::InitLayer
    }

    fn param_count(&self) -> usize {
        0
    }

    fn param_name(&self, _index: usize) -> &'static str {
        ""
    }

    fn edit_param(&mut self, _index: usize, _delta: i32, _shift: bool) {}

    fn print_param(&self, _index: usize, _out: &mut String) {}

    fn init(&mut self) {
        self.update();
    }

    fn update(&mut self) {
        for i in 0..self.sink.length() {
            if self.selected.is_selected(i) {
                self.sink.clear_value(i);
            }
        }
    }

    fn sink(&mut self) -> &mut dyn PatternSink {
        &mut *self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::LayerBuilder;

    #[test]
    fn test_clears_selected_steps() {
        let mut layer = LayerBuilder::with_default(vec![0.9, 0.8, 0.7, 0.6], 0.25);
        let selected = StepSelection::from_steps([0, 2]);
        {
            let mut generator = InitLayerGenerator::new(&mut layer, &selected);
            assert_eq!(generator.param_count(), 0);
            generator.init();
        }
        assert_eq!(layer.values(), &[0.25, 0.8, 0.25, 0.6]);
    }

    #[test]
    fn test_revert_undoes_clear() {
        let mut layer = LayerBuilder::new(vec![0.4; 3]);
        let selected = StepSelection::all();
        {
            let mut generator = InitLayerGenerator::new(&mut layer, &selected);
            generator.init();
            generator.revert();
        }
        assert_eq!(layer.values(), &[0.4; 3]);
    }
}

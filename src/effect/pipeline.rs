//! Priority-ordered effect chain

use super::{
    DurabilityBarEffect, EffectContext, GlintImageEffect, HoverImageEffect, ImageEffect, OverlayApplicationEffect,
};
use crate::error::GeneratorResult;
use crate::sprites::SpriteStore;
use std::sync::Arc;
use tracing::debug;

/// Runs effects in ascending priority order
///
/// Effects with equal priority keep their insertion order. The pipeline
/// holds no mutable state and can be shared across render threads.
#[derive(Default)]
pub struct EffectPipeline {
    effects: Vec<Box<dyn ImageEffect>>,
}

impl EffectPipeline {
    pub fn new(effects: Vec<Box<dyn ImageEffect>>) -> Self {
        let mut effects = effects;
        effects.sort_by_key(|e| e.priority());
        Self { effects }
    }

    /// Add an effect, keeping the chain sorted.
    pub fn with_effect(self, effect: impl ImageEffect + 'static) -> Self {
        let mut effects = self.effects;
        effects.push(Box::new(effect));
        Self::new(effects)
    }

    /// Overlay, glint, hover and durability, in that order.
    pub fn default_item_pipeline(sprites: Arc<dyn SpriteStore>) -> Self {
        let glint = GlintImageEffect::new(sprites.glint_texture().clone());
        Self::default()
            .with_effect(OverlayApplicationEffect::new(sprites))
            .with_effect(glint)
            .with_effect(HoverImageEffect)
            .with_effect(DurabilityBarEffect)
    }

    /// Effect names in execution order.
    pub fn effect_names(&self) -> Vec<&str> {
        self.effects.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Thread `initial` through every applicable effect.
    ///
    /// Each stage sees the output of the previous one. Metadata and flags
    /// are carried from `initial`.
    pub fn execute(&self, initial: EffectContext) -> GeneratorResult<EffectContext> {
        let mut current: Option<EffectContext> = None;

        for effect in &self.effects {
            let context = current.as_ref().unwrap_or(&initial);
            if !effect.can_apply(context) {
                debug!("Skipping effect {} (conditions not met)", effect.name());
                continue;
            }
            debug!("Applying effect: {} (priority: {})", effect.name(), effect.priority());
            let result = effect.apply(context)?;
            current = Some(result.into_context(&initial));
        }

        Ok(current.unwrap_or(initial))
    }
}

impl std::fmt::Debug for EffectPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectPipeline").field("effects", &self.effect_names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectResult;
    use image::{Rgba, RgbaImage};
    use std::sync::Mutex;

    /// Records the order it ran in and adds `step` to the red channel.
    struct Recorder {
        name: &'static str,
        priority: i32,
        step: u8,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl ImageEffect for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn can_apply(&self, _context: &EffectContext) -> bool {
            true
        }

        fn apply(&self, context: &EffectContext) -> GeneratorResult<EffectResult> {
            self.log.lock().unwrap().push(self.name);
            let step = self.step;
            Ok(EffectResult::map_frames(context, |frame| {
                let mut out = frame.clone();
                out.get_pixel_mut(0, 0).0[0] += step;
                out
            }))
        }
    }

    fn recorder(name: &'static str, priority: i32, log: &Arc<Mutex<Vec<&'static str>>>) -> Recorder {
        Recorder { name, priority, step: 1, log: Arc::clone(log) }
    }

    #[test]
    fn test_effects_run_by_priority_then_insertion() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = EffectPipeline::default()
            .with_effect(recorder("late", 300, &log))
            .with_effect(recorder("first_tie", 100, &log))
            .with_effect(recorder("early", 50, &log))
            .with_effect(recorder("second_tie", 100, &log));

        assert_eq!(pipeline.effect_names(), vec!["early", "first_tie", "second_tie", "late"]);

        let ctx = EffectContext::builder(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]))).build();
        let out = pipeline.execute(ctx).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["early", "first_tie", "second_tie", "late"]);
        // each stage saw the previous stage's output
        assert_eq!(out.image().get_pixel(0, 0).0[0], 4);
    }

    #[test]
    fn test_empty_pipeline_returns_input() {
        let ctx = EffectContext::builder(RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]))).item_id("stone").build();
        let out = EffectPipeline::default().execute(ctx.clone()).unwrap();
        assert_eq!(out.image(), ctx.image());
        assert_eq!(out.item_id(), "stone");
    }

    #[test]
    fn test_skipped_effects_do_not_change_context() {
        let ctx = EffectContext::builder(RgbaImage::from_pixel(1, 1, Rgba([5, 5, 5, 255]))).build();
        let pipeline = EffectPipeline::default().with_effect(HoverImageEffect).with_effect(DurabilityBarEffect);
        let out = pipeline.execute(ctx).unwrap();
        assert_eq!(out.image().get_pixel(0, 0), &Rgba([5, 5, 5, 255]));
        assert!(!out.is_animated());
    }
}

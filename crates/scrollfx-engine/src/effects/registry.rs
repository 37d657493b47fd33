//! Effect registry: bindings plus their per-element runtime state

use std::collections::HashMap;

use scrollfx_core::{EffectBinding, EffectKind, EffectParams, Error, TargetId};
use tracing::{debug, warn};

use super::magnetic::MagneticState;
use super::parallax::ParallaxState;
use super::progress::ProgressState;
use super::reveal::RevealState;
use super::scroll_class::ScrollClassState;
use super::{EffectError, FrameContext};
use crate::surface::{Mutation, Surface};
use crate::viewport::ViewportEvent;

#[derive(Debug)]
enum EffectState {
    Parallax(ParallaxState),
    Reveal(RevealState),
    ProgressBar(ProgressState),
    Magnetic(MagneticState),
    ScrollClass(ScrollClassState),
}

impl EffectState {
    /// Forget what was last written so the next frame writes again
    fn invalidate(&mut self) {
        match self {
            EffectState::ProgressBar(state) => state.invalidate(),
            EffectState::ScrollClass(state) => state.invalidate(),
            EffectState::Parallax(_) | EffectState::Magnetic(_) | EffectState::Reveal(_) => {}
        }
    }

    fn for_kind(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Parallax => EffectState::Parallax(ParallaxState::default()),
            EffectKind::Reveal => EffectState::Reveal(RevealState::default()),
            EffectKind::ProgressBar => EffectState::ProgressBar(ProgressState::default()),
            EffectKind::Magnetic => EffectState::Magnetic(MagneticState::default()),
            EffectKind::ScrollClass => EffectState::ScrollClass(ScrollClassState::default()),
        }
    }
}

#[derive(Debug)]
struct EffectSlot {
    binding: EffectBinding,
    state: EffectState,
}

/// A handler that failed during a frame and was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct EffectFailure {
    pub target: TargetId,
    pub kind: EffectKind,
    pub error: EffectError,
}

/// What one continuous handler produced for a frame
enum Output {
    Writes(Vec<Mutation>),
    /// Contribution to the target's merged translate
    Offset(f64, f64),
}

/// Registered effect bindings in registration order
#[derive(Debug, Default)]
pub struct EffectRegistry {
    slots: Vec<EffectSlot>,
    /// Last merged translate written per element
    translates: HashMap<TargetId, (f64, f64)>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding
    ///
    /// Fails with `DuplicateBinding` if the target already has an effect of
    /// the same kind; the existing binding is left untouched.
    pub fn register(&mut self, binding: EffectBinding) -> scrollfx_core::Result<()> {
        let kind = binding.kind();
        if self.contains(&binding.target, kind) {
            return Err(Error::DuplicateBinding {
                target: binding.target,
                kind,
            });
        }
        debug!("Registered {} effect for {}", kind, binding.target);
        self.slots.push(EffectSlot {
            binding,
            state: EffectState::for_kind(kind),
        });
        Ok(())
    }

    /// Remove every binding of a target, returning how many were removed
    pub fn unregister(&mut self, target: &TargetId) -> usize {
        let before = self.slots.len();
        self.slots.retain(|slot| &slot.binding.target != target);
        self.translates.remove(target);
        before - self.slots.len()
    }

    pub fn contains(&self, target: &TargetId, kind: EffectKind) -> bool {
        self.get(target, kind).is_some()
    }

    pub fn get(&self, target: &TargetId, kind: EffectKind) -> Option<&EffectBinding> {
        self.slots
            .iter()
            .map(|slot| &slot.binding)
            .find(|b| &b.target == target && b.kind() == kind)
    }

    /// Bindings in registration order
    pub fn bindings(&self) -> impl Iterator<Item = &EffectBinding> {
        self.slots.iter().map(|slot| &slot.binding)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether a reveal binding for `target` has already fired
    pub fn is_revealed(&self, target: &TargetId) -> bool {
        self.slots.iter().any(|slot| {
            &slot.binding.target == target
                && matches!(&slot.state, EffectState::Reveal(state) if state.is_revealed())
        })
    }

    /// Every element whose rect the continuous effects read
    pub fn measured_targets(&self) -> Vec<TargetId> {
        let mut targets: Vec<TargetId> = Vec::new();
        for slot in &self.slots {
            let target = match &slot.binding.params {
                EffectParams::Parallax { trigger, .. } => {
                    trigger.as_ref().unwrap_or(&slot.binding.target)
                }
                EffectParams::Magnetic { .. } => &slot.binding.target,
                EffectParams::Reveal { .. }
                | EffectParams::ProgressBar
                | EffectParams::ScrollClass { .. } => continue,
            };
            if !targets.contains(target) {
                targets.push(target.clone());
            }
        }
        targets
    }

    /// Run the continuous effects for one frame in registration order
    ///
    /// Parallax and magnetic offsets on the same element are summed into one
    /// translate, written at the position of the element's first offsetting
    /// binding. A failing handler is logged and skipped; the others still
    /// run.
    pub fn update(&mut self, ctx: &FrameContext<'_>, surface: &mut dyn Surface) -> Vec<EffectFailure> {
        let outputs: Vec<Result<Output, EffectError>> = self
            .slots
            .iter_mut()
            .map(|slot| {
                let binding = &slot.binding;
                match (&binding.params, &mut slot.state) {
                    (
                        EffectParams::Parallax {
                            speed,
                            trigger,
                            scrub_ms,
                        },
                        EffectState::Parallax(state),
                    ) => {
                        let trigger = trigger.as_ref().unwrap_or(&binding.target);
                        state
                            .update(*speed, trigger, *scrub_ms, ctx)
                            .map(|(x, y)| Output::Offset(x, y))
                    }
                    (
                        EffectParams::Magnetic {
                            attraction,
                            duration_ms,
                        },
                        EffectState::Magnetic(state),
                    ) => state
                        .update(&binding.target, *attraction, *duration_ms, ctx)
                        .map(|(x, y)| Output::Offset(x, y)),
                    (EffectParams::ProgressBar, EffectState::ProgressBar(state)) => {
                        Ok(Output::Writes(state.update(&binding.target, ctx).into_iter().collect()))
                    }
                    (EffectParams::ScrollClass { classes }, EffectState::ScrollClass(state)) => {
                        Ok(Output::Writes(state.update(&binding.target, classes, ctx)))
                    }
                    _ => Ok(Output::Writes(Vec::new())),
                }
            })
            .collect();

        let mut offsets: HashMap<TargetId, (f64, f64)> = HashMap::new();
        for (slot, output) in self.slots.iter().zip(&outputs) {
            if let Ok(Output::Offset(x, y)) = output {
                let sum = offsets.entry(slot.binding.target.clone()).or_insert((0.0, 0.0));
                sum.0 += x;
                sum.1 += y;
            }
        }

        let mut failures = Vec::new();
        let mut written: HashMap<TargetId, Result<(), EffectError>> = HashMap::new();
        for (slot, output) in self.slots.iter_mut().zip(outputs) {
            let binding = &slot.binding;
            let outcome = match output {
                Err(e) => Err(e),
                Ok(Output::Writes(mutations)) => {
                    let applied = mutations.iter().try_for_each(|m| surface.apply(m));
                    if applied.is_err() {
                        slot.state.invalidate();
                    }
                    applied
                }
                Ok(Output::Offset(..)) => match written.get(&binding.target) {
                    Some(result) => result.clone(),
                    None => {
                        let (x, y) = offsets.get(&binding.target).copied().unwrap_or_default();
                        let result = if self.translates.get(&binding.target) == Some(&(x, y)) {
                            Ok(())
                        } else {
                            let applied = surface.apply(&Mutation::Translate {
                                target: binding.target.clone(),
                                x,
                                y,
                            });
                            match applied {
                                Ok(()) => {
                                    self.translates.insert(binding.target.clone(), (x, y));
                                }
                                Err(_) => {
                                    self.translates.remove(&binding.target);
                                }
                            }
                            applied
                        };
                        written.insert(binding.target.clone(), result.clone());
                        result
                    }
                },
            };

            if let Err(error) = outcome {
                warn!("Skipping {} effect for {} this frame: {}", binding.kind(), binding.target, error);
                failures.push(EffectFailure {
                    target: binding.target.clone(),
                    kind: binding.kind(),
                    error,
                });
            }
        }

        failures
    }

    /// Feed viewport events to the one-shot reveal effects
    pub fn dispatch_viewport(
        &mut self,
        events: &[ViewportEvent],
        surface: &mut dyn Surface,
    ) -> Vec<EffectFailure> {
        let mut failures = Vec::new();

        for event in events {
            for slot in &mut self.slots {
                if &slot.binding.target != event.target() {
                    continue;
                }
                let (EffectParams::Reveal { delay_ms, .. }, EffectState::Reveal(state)) =
                    (&slot.binding.params, &mut slot.state)
                else {
                    continue;
                };
                let Some(mutation) = state.on_event(&slot.binding.target, *delay_ms, event) else {
                    continue;
                };
                if let Err(error) = surface.apply(&mutation) {
                    warn!("Reveal of {} failed: {}", slot.binding.target, error);
                    failures.push(EffectFailure {
                        target: slot.binding.target.clone(),
                        kind: EffectKind::Reveal,
                        error,
                    });
                }
            }
        }

        failures
    }
}

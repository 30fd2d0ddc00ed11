//! Narrative text seam.
//!
//! Flavor text is cosmetic. The engine computes the outcome first, then asks
//! the narrator for a description. A narrator may decline by returning `None`,
//! in which case [`TemplateNarrator`] renders a fixed sentence.

use crate::combat::ActionResult;
use crate::state::StatusEffectKind;

/// Everything a narrator may describe about one resolved action.
#[derive(Clone, Copy, Debug)]
pub struct NarrationContext<'a> {
    pub attacker: &'a str,
    pub defender: &'a str,
    /// Action or ability name as shown in the log.
    pub action: &'a str,
    pub result: ActionResult,
    pub damage: i32,
    pub status: Option<StatusEffectKind>,
}

/// Produces flavor text for resolved actions.
///
/// Implementations must not block. Anything slow belongs behind a cache the
/// narrator can answer from synchronously.
pub trait Narrator: Send + Sync {
    fn describe(&self, ctx: &NarrationContext<'_>) -> Option<String>;
}

/// Deterministic fallback keyed by result.
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    pub fn render(ctx: &NarrationContext<'_>) -> String {
        let mut text = match ctx.result {
            ActionResult::Critical => format!(
                "{}'s {} CRITICALLY strikes {} for {} damage!",
                ctx.attacker, ctx.action, ctx.defender, ctx.damage
            ),
            ActionResult::Hit => format!(
                "{}'s {} hits {} for {} damage.",
                ctx.attacker, ctx.action, ctx.defender, ctx.damage
            ),
            other => format!("{}'s attack {}.", ctx.attacker, other),
        };

        if let Some(status) = ctx.status {
            text.push_str(&format!(" {} is now afflicted with {}!", ctx.defender, status));
        }

        text
    }
}

impl Narrator for TemplateNarrator {
    fn describe(&self, ctx: &NarrationContext<'_>) -> Option<String> {
        Some(Self::render(ctx))
    }
}

/// Asks `narrator` first and falls back to the template.
pub fn narrate(narrator: Option<&dyn Narrator>, ctx: &NarrationContext<'_>) -> String {
    match narrator {
        Some(narrator) => narrator.describe(ctx).unwrap_or_else(|| {
            tracing::warn!(action = ctx.action, "narrator declined, using template text");
            TemplateNarrator::render(ctx)
        }),
        None => TemplateNarrator::render(ctx),
    }
}

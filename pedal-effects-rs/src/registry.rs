//! Effect identifiers and the registry that owns one instance of each.
//!
//! The set of effects is closed: adding one means a new [`EffectId`]
//! variant, a field in [`Registry`] and an arm in
//! [`Registry::resolve`](EffectRegistry::resolve).

use pedal_controls::SelectorCode;

use crate::bypass::Bypass;
use crate::echo::SingleEcho;
use crate::effect::Effect;
use crate::hw_test::HwTest;

// ── EffectId ─────────────────────────────────────────────────────────

/// Effect chosen by the selector.
///
/// Selector codes map to identifiers one to one; every code without an
/// effect decodes to [`EffectId::Unset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EffectId {
    HwTest,
    SingleEcho,
    Bypass,
    Unset,
}

impl EffectId {
    /// Effect used for `Unset` and unknown codes.
    pub const FALLBACK: EffectId = EffectId::Bypass;

    pub const fn from_code(code: SelectorCode) -> Self {
        match code.value() {
            0 => EffectId::HwTest,
            1 => EffectId::SingleEcho,
            2 => EffectId::Bypass,
            _ => EffectId::Unset,
        }
    }

    /// The selector code for this effect, `None` for `Unset`.
    pub const fn code(self) -> Option<SelectorCode> {
        match self {
            EffectId::HwTest => Some(SelectorCode::from_raw(0)),
            EffectId::SingleEcho => Some(SelectorCode::from_raw(1)),
            EffectId::Bypass => Some(SelectorCode::from_raw(2)),
            EffectId::Unset => None,
        }
    }

    /// The identifier actually run: `Unset` becomes [`Self::FALLBACK`].
    pub const fn resolved(self) -> Self {
        match self {
            EffectId::Unset => Self::FALLBACK,
            id => id,
        }
    }
}

// ── EffectRegistry ───────────────────────────────────────────────────

/// Lookup from identifier to a long-lived effect instance.
pub trait EffectRegistry {
    /// Instance for `id`. Never fails: unknown identifiers yield the
    /// fallback effect.
    fn resolve(&mut self, id: EffectId) -> &mut dyn Effect;
}

/// The pedal's effects, one instance each.
pub struct Registry<'a> {
    hw_test: HwTest,
    single_echo: SingleEcho<'a>,
    bypass: Bypass,
}

impl<'a> Registry<'a> {
    pub fn new(single_echo: SingleEcho<'a>) -> Self {
        Self {
            hw_test: HwTest::new(),
            single_echo,
            bypass: Bypass::new(),
        }
    }

    pub fn single_echo(&self) -> &SingleEcho<'a> {
        &self.single_echo
    }
}

impl EffectRegistry for Registry<'_> {
    fn resolve(&mut self, id: EffectId) -> &mut dyn Effect {
        match id.resolved() {
            EffectId::HwTest => &mut self.hw_test,
            EffectId::SingleEcho => &mut self.single_echo,
            EffectId::Bypass | EffectId::Unset => &mut self.bypass,
        }
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

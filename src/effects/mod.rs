//! Effect system.
//!
//! - `Effect`: one timed ability invocation with its option map
//! - `OperandContext`: evaluates option expressions against the units
//! - `EffectResolver`: dispatches effects to their ability handlers
//!
//! Handlers validate every option before the first write, so an effect
//! that reports failure leaves the battle untouched.

mod abilities;
mod effect;
pub mod identifier;
mod parser;
mod resolver;

pub use abilities::capture_probability;
pub use effect::{Effect, EffectAbility, EffectSource, EffectTiming};
pub use identifier::{NamedAttributeAccessor, NOT_FOUND};
pub use parser::{evaluate, try_evaluate, OperandContext};
pub use resolver::{AbilityHandler, EffectResolver, EffectScope, ResolverContext};

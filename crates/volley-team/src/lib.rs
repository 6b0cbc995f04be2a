//! Team coordination for bot-controlled vehicles: who goes for the object, who
//! supports, and when it is safe to fetch boost.

pub mod accel;
pub mod arrival;
mod boost;
mod coordinator;
mod decision;
mod directive;
mod human;
pub mod intercept;
mod memory;
mod support;
mod team_context;
pub mod tuning;

pub use boost::{choose_pad, is_safe_to_detour};
pub use coordinator::TeamCoordinator;
pub use decision::{
    decide, is_kickoff, role_label, Decision, DecisionCtx, DecisionReason, DecisionSignals,
    DecisionTrace,
};
pub use directive::{Directive, DirectiveKind};
pub use human::{HumanAggressionTracker, NEUTRAL_AGGRESSION};
pub use intercept::{Intercept, InterceptQuery};
pub use memory::DecisionMemory;
pub use support::{hold_position, support_anchor, support_standoff};
pub use team_context::TeamContext;

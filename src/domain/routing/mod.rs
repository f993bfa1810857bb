//! Turn routing: intent taxonomy, conversation state, dispatch table, and
//! the per-turn routing state machine.

mod dispatch;
mod intent;
mod router;
mod state;

pub use dispatch::{department_handler, handler_for};
pub use intent::{DiagnosisDepartment, HandlerId, Intent, IntentResult};
pub use router::{RouteDecision, RouterPhase, TurnRouter};
pub use state::{ConversationState, Turn, TurnRole};

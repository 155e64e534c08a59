use trigger_engine_core::StateTransitionEvent;

/// Observer notified after each matched transition, outside the engine lock.
///
/// Calls are serialized in the order transitions were committed. A listener
/// must not process triggers on the engine that notifies it.
pub trait TransitionListener: Send + Sync {
    fn on_transition(&self, event: &StateTransitionEvent);
}

use foundation::ids::ElementId;
use foundation::time::Time;
use serde::Serialize;

/// Structured trace record.
///
/// Events are appended in emission order and carry the clock time at which they
/// were produced, so a recorded session can be compared against a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    pub at: Time,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementId>,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<TraceEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, at: Time, kind: &'static str, message: impl Into<String>) {
        self.push(at, kind, None, message.into());
    }

    pub fn emit_for(
        &mut self,
        at: Time,
        kind: &'static str,
        element: ElementId,
        message: impl Into<String>,
    ) {
        self.push(at, kind, Some(element), message.into());
    }

    fn push(&mut self, at: Time, kind: &'static str, element: Option<ElementId>, message: String) {
        self.events.push(TraceEvent {
            at,
            kind,
            element,
            message,
        });
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<TraceEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use foundation::ids::ElementId;
    use foundation::time::Time;

    #[test]
    fn records_events_with_time_and_element() {
        let mut bus = EventBus::new();
        bus.emit_for(Time(0.5), "trigger", ElementId::new(3), "hello");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].at, Time(0.5));
        assert_eq!(bus.events()[0].element, Some(ElementId::new(3)));
    }

    #[test]
    fn keeps_emission_order() {
        let mut bus = EventBus::new();
        bus.emit(Time(0.0), "scan", "a");
        bus.emit(Time(0.1), "trigger", "b");
        bus.emit(Time(0.2), "trigger", "c");
        let msgs: Vec<_> = bus.events().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(msgs, vec!["a", "b", "c"]);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Time(0.0), "k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}

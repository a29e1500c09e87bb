pub mod control;
pub mod polling;
pub mod session;
mod ui;

use crux_core::Command;

use crate::events::Event;
use crate::model::Model;
use crate::Effect;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        // Initialization
        Event::Initialize => polling::start_polling(model),

        // Device address, status fetches and timings
        Event::Session(session_event) => session::handle(session_event, model),

        // Output and actuator commands
        Event::Control(control_event) => control::handle(control_event, model),

        // Poll and reconnect timers
        Event::Timer(timer_event) => polling::handle_timer(timer_event, model),

        // UI actions domain
        Event::Ui(ui_event) => ui::handle(ui_event, model),
    }
}

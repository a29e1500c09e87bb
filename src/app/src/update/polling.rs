use crux_core::Command;

use crate::events::{Event, TimerEvent};
use crate::model::Model;
use crate::types::TimerId;
use crate::{Effect, TimerCmd};

use super::session::fetch_status;

/// (Re)start the polling cadence against the current device address.
///
/// Cancels the running poll timer, fetches immediately and arms a fresh poll
/// timer measured from that fetch. While disconnected a reconnect timer is
/// armed as well, unless one is already pending.
pub fn start_polling(model: &mut Model) -> Command<Effect, Event> {
    let mut commands = Vec::new();

    if let Some(id) = model.poll_timer.take() {
        commands.push(cancel_timer(id));
    }

    commands.push(fetch_status(model));
    commands.push(arm_poll_timer(model));

    if !model.is_connected && model.reconnect_timer.is_none() {
        commands.push(arm_reconnect_timer(model));
    }

    Command::all(commands)
}

/// Handle timer expiry and cancellation reported by the shell
pub fn handle_timer(event: TimerEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        TimerEvent::Elapsed(id) if model.poll_timer == Some(id) => {
            Command::all([fetch_status(model), arm_poll_timer(model)])
        }

        TimerEvent::Elapsed(id) if model.reconnect_timer == Some(id) => {
            model.reconnect_timer = None;
            log::debug!("reconnecting to {}", model.device_address);
            fetch_status(model)
        }

        TimerEvent::Elapsed(id) => {
            log::debug!("ignoring stale {id}");
            Command::done()
        }

        TimerEvent::Cancelled(id) => {
            log::debug!("{id} cancelled");
            Command::done()
        }
    }
}

/// Arm the next poll tick
pub fn arm_poll_timer(model: &mut Model) -> Command<Effect, Event> {
    let id = model.next_timer();
    model.poll_timer = Some(id);
    start_timer(id, model.timings.poll_interval_ms)
}

/// Arm a one-shot reconnect attempt
pub fn arm_reconnect_timer(model: &mut Model) -> Command<Effect, Event> {
    let id = model.next_timer();
    model.reconnect_timer = Some(id);
    start_timer(id, model.timings.reconnect_delay_ms)
}

pub fn cancel_timer(id: TimerId) -> Command<Effect, Event> {
    TimerCmd::cancel(id)
        .build()
        .then_send(|output| Event::Timer(output.into()))
}

fn start_timer(id: TimerId, millis: u64) -> Command<Effect, Event> {
    TimerCmd::start(id, millis)
        .build()
        .then_send(|output| Event::Timer(output.into()))
}

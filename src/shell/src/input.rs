use anyhow::{anyhow, bail, Context, Result};
use esp32_panel_core::{
    events::{ControlEvent, SessionEvent, UiEvent},
    ActuatorPosition, Event, OutputState,
};
use std::str::FromStr;

pub const HELP: &str = "commands: status | led <1-5> on|off | all on|off | servo open|close | address <host> | clear | quit";

/// One line of panel input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Event(Event),
    Help,
    Quit,
}

impl FromStr for Input {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let command = words
            .next()
            .ok_or_else(|| anyhow!("empty command"))?
            .to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let input = match (command.as_str(), args.as_slice()) {
            ("status" | "refresh", []) => Input::Event(Event::Session(SessionEvent::FetchStatus)),
            ("led", [index, state]) => {
                let index = index
                    .parse::<u8>()
                    .with_context(|| format!("invalid LED number '{index}'"))?;
                Input::Event(Event::Control(ControlEvent::SetOutput {
                    index,
                    state: parse_state(state)?,
                }))
            }
            ("all", [state]) => Input::Event(Event::Control(ControlEvent::SetAllOutputs {
                state: parse_state(state)?,
            })),
            ("servo", [position]) => Input::Event(Event::Control(ControlEvent::SetActuator {
                position: parse_position(position)?,
            })),
            ("address", [address]) => {
                Input::Event(Event::Session(SessionEvent::SetDeviceAddress {
                    address: address.to_string(),
                }))
            }
            ("clear", []) => Input::Event(Event::Ui(UiEvent::ClearError)),
            ("help" | "?", []) => Input::Help,
            ("quit" | "exit", []) => Input::Quit,
            _ => bail!("unknown command '{}'", line.trim()),
        };

        Ok(input)
    }
}

fn parse_state(word: &str) -> Result<OutputState> {
    match word.to_ascii_lowercase().as_str() {
        "on" => Ok(OutputState::On),
        "off" => Ok(OutputState::Off),
        _ => bail!("invalid state '{word}': expected on or off"),
    }
}

fn parse_position(word: &str) -> Result<ActuatorPosition> {
    match word.to_ascii_lowercase().as_str() {
        "open" => Ok(ActuatorPosition::Open),
        "close" => Ok(ActuatorPosition::Close),
        _ => bail!("invalid position '{word}': expected open or close"),
    }
}

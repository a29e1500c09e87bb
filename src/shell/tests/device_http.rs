use crux_http::{
    protocol::{HttpRequest, HttpResult},
    HttpError,
};
use esp32_panel::{http_client, Shell};
use esp32_panel_core::{
    events::{ControlEvent, SessionEvent},
    DeviceStatus, Event, OutputState, Timings,
};
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    time::timeout,
};

/// Minimal stand-in for the device firmware
#[derive(Clone, Default)]
struct MockDevice {
    status: Arc<Mutex<DeviceStatus>>,
    failing: bool,
}

impl MockDevice {
    async fn spawn(self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let device = self.clone();
                tokio::spawn(async move { device.serve(stream).await });
            }
        });

        addr
    }

    async fn serve(&self, mut stream: TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }

        let request = String::from_utf8_lossy(&buf);
        let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
        let (code, body) = self.handle(&path);

        let response = format!(
            "HTTP/1.1 {code}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes()).await;
    }

    fn handle(&self, path: &str) -> (&'static str, String) {
        if self.failing {
            return ("500 Internal Server Error", "overheated".to_string());
        }

        let mut status = self.status.lock().unwrap();
        let state = |value: &str| match value {
            "ON" => Some(OutputState::On),
            "OFF" => Some(OutputState::Off),
            _ => None,
        };

        match path.trim_start_matches('/').split_once('=') {
            None if path == "/status" => {
                return ("200 OK", serde_json::to_string(&*status).unwrap());
            }
            Some(("ALLLEDS", value)) if state(value).is_some() => {
                let value = state(value).unwrap();
                status.led1 = value;
                status.led2 = value;
                status.led3 = value;
                status.led4 = value;
                status.led5 = value;
            }
            Some(("LED1", value)) if state(value).is_some() => status.led1 = state(value).unwrap(),
            Some(("LED2", value)) if state(value).is_some() => status.led2 = state(value).unwrap(),
            Some(("LED3", value)) if state(value).is_some() => status.led3 = state(value).unwrap(),
            Some(("LED4", value)) if state(value).is_some() => status.led4 = state(value).unwrap(),
            Some(("LED5", value)) if state(value).is_some() => status.led5 = state(value).unwrap(),
            Some(("SERVO", "OPEN")) => status.servo = 40,
            Some(("SERVO", "CLOSE")) => status.servo = 130,
            _ => return ("404 Not Found", String::new()),
        }

        ("200 OK", "OK".to_string())
    }
}

/// Address nothing listens on
async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn get(url: String) -> HttpRequest {
    HttpRequest {
        method: "GET".to_string(),
        url,
        headers: vec![],
        body: vec![],
    }
}

fn client() -> reqwest::Client {
    http_client::device_client(Duration::from_secs(2)).unwrap()
}

fn shell() -> Shell {
    let mut shell = Shell::new(client(), Box::new(std::io::sink()));
    // keep timers out of the way; these tests drive requests explicitly
    shell.dispatch(Event::Session(SessionEvent::SetTimings(Timings {
        poll_interval_ms: 60_000,
        reconnect_delay_ms: 60_000,
    })));
    shell
}

async fn settle(shell: &mut Shell) {
    timeout(Duration::from_secs(10), async {
        while shell.view().is_loading {
            shell.step().await.unwrap();
        }
    })
    .await
    .expect("shell did not settle");
}

#[tokio::test]
async fn execute_returns_status_body() {
    let device = MockDevice::default();
    device.status.lock().unwrap().led3 = OutputState::On;
    let addr = device.spawn().await;

    let result = http_client::execute(&client(), &get(format!("http://{addr}/status"))).await;

    let HttpResult::Ok(response) = result else {
        panic!("expected response, got {result:?}");
    };
    assert_eq!(response.status, 200);
    let status: DeviceStatus = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(status.led3, OutputState::On);
    assert_eq!(status.servo, 130);
}

#[tokio::test]
async fn execute_passes_error_status_through() {
    let addr = MockDevice {
        failing: true,
        ..Default::default()
    }
    .spawn()
    .await;

    let result = http_client::execute(&client(), &get(format!("http://{addr}/LED1=ON"))).await;

    let HttpResult::Ok(response) = result else {
        panic!("expected response, got {result:?}");
    };
    assert_eq!(response.status, 500);
    assert_eq!(response.body, b"overheated");
}

#[tokio::test]
async fn execute_reports_refused_connection() {
    let addr = closed_addr().await;

    let result = http_client::execute(&client(), &get(format!("http://{addr}/status"))).await;

    assert!(matches!(result, HttpResult::Err(HttpError::Io(_))));
}

#[tokio::test]
async fn shell_connects_and_switches_all_outputs() {
    let device = MockDevice::default();
    let addr = device.clone().spawn().await;
    let mut shell = shell();

    shell.dispatch(Event::Session(SessionEvent::SetDeviceAddress {
        address: addr.to_string(),
    }));
    settle(&mut shell).await;

    let view = shell.view();
    assert!(view.is_connected);
    assert_eq!(view.error_message, None);
    assert_eq!(view.status, DeviceStatus::default());

    shell.dispatch(Event::Control(ControlEvent::SetAllOutputs {
        state: OutputState::On,
    }));
    settle(&mut shell).await;

    let view = shell.view();
    assert!(view.status.outputs().iter().all(OutputState::is_on));
    assert_eq!(*device.status.lock().unwrap(), view.status);
}

#[tokio::test]
async fn shell_reports_unreachable_device() {
    let addr = closed_addr().await;
    let mut shell = shell();

    shell.dispatch(Event::Session(SessionEvent::SetDeviceAddress {
        address: addr.to_string(),
    }));
    settle(&mut shell).await;

    let view = shell.view();
    assert!(!view.is_connected);
    assert_eq!(
        view.error_message.as_deref(),
        Some("Failed to connect to the ESP32")
    );
    // poll and reconnect timers stay armed
    assert_eq!(shell.pending(), 2);
}

#[tokio::test]
async fn shell_reports_failed_command_and_keeps_status() {
    let device = MockDevice::default();
    let addr = device.clone().spawn().await;
    let mut shell = shell();

    shell.dispatch(Event::Session(SessionEvent::SetDeviceAddress {
        address: addr.to_string(),
    }));
    settle(&mut shell).await;

    shell.dispatch(Event::Control(ControlEvent::SetOutput {
        index: 9,
        state: OutputState::On,
    }));
    settle(&mut shell).await;

    let view = shell.view();
    assert!(view.is_connected);
    assert_eq!(view.status, DeviceStatus::default());
    assert!(view
        .error_message
        .as_deref()
        .is_some_and(|e| e.starts_with("Invalid output index 9")));
}

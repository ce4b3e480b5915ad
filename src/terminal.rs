//! A line-oriented stand-in for the host page.

use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, oneshot};

use crate::host::{Clipboard, Control, Dialog, HostBridge, Region, Surface, WHEEL_ID};
use crate::models::identity::HostUser;
use crate::services::UiEvent;
use crate::settings;

pub struct StaticHost {
    user: Option<HostUser>,
}

impl StaticHost {
    pub fn new(host: &settings::Host) -> Self {
        let user = match (&host.user_id, &host.username, &host.first_name) {
            (None, None, None) => None,
            _ => Some(HostUser {
                id: host.user_id,
                username: host.username.clone(),
                first_name: host.first_name.clone(),
            }),
        };

        StaticHost { user }
    }
}

impl HostBridge for StaticHost {
    fn ready(&self) {
        log::info!("Host bridge ready.");
    }

    fn user(&self) -> Option<HostUser> {
        self.user.clone()
    }
}

/// Shared output sink for every terminal capability.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Console {
            out: Arc::new(Mutex::new(out)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
            log::error!("Could not write to console: {}", e);
        }
    }
}

pub struct TerminalSurface {
    console: Console,
}

impl TerminalSurface {
    pub fn new(console: Console) -> Self {
        TerminalSurface { console }
    }
}

impl Surface for TerminalSurface {
    fn set_html(&self, region: Region, html: &str) {
        self.console.line(&format!("[{}]\n{}", region.id(), html));
    }

    fn set_text(&self, region: Region, text: &str) {
        self.console.line(&format!("[{}] {}", region.id(), text));
    }

    fn set_disabled(&self, control: Control, disabled: bool) {
        let state = if disabled { "disabled" } else { "enabled" };
        self.console.line(&format!("({} {})", control.id(), state));
    }

    fn set_spinning(&self, spinning: bool) {
        if spinning {
            self.console.line(&format!("({} spinning...)", WHEEL_ID));
        } else {
            self.console.line(&format!("({} stopped)", WHEEL_ID));
        }
    }
}

/// Slot for the reply to an open prompt. Input lines go here first.
#[derive(Clone, Default)]
pub struct PendingPrompt {
    reply: Arc<Mutex<Option<oneshot::Sender<String>>>>,
}

impl PendingPrompt {
    fn open(&self) -> oneshot::Receiver<String> {
        let (tx, rx) = oneshot::channel();
        *self.reply.lock().unwrap_or_else(|e| e.into_inner()) = Some(tx);
        rx
    }

    fn take(&self) -> Option<oneshot::Sender<String>> {
        self.reply.lock().unwrap_or_else(|e| e.into_inner()).take()
    }

    /// Dismisses any open prompt.
    pub fn cancel(&self) {
        drop(self.take());
    }
}

pub struct TerminalDialog {
    console: Console,
    pending: PendingPrompt,
}

impl TerminalDialog {
    pub fn new(console: Console, pending: PendingPrompt) -> Self {
        TerminalDialog { console, pending }
    }
}

#[async_trait]
impl Dialog for TerminalDialog {
    async fn alert(&self, message: &str) {
        self.console.line(&format!("! {}", message));
    }

    async fn prompt(&self, message: &str) -> Option<String> {
        let reply = self.pending.open();
        self.console.line(&format!("? {}", message));

        reply.await.ok()
    }
}

pub struct TerminalClipboard {
    console: Console,
}

impl TerminalClipboard {
    pub fn new(console: Console) -> Self {
        TerminalClipboard { console }
    }
}

#[async_trait]
impl Clipboard for TerminalClipboard {
    async fn write_text(&self, text: &str) -> Result<(), anyhow::Error> {
        self.console.line(&format!("(copied) {}", text));
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Event(UiEvent),
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "spin" => Some(Command::Event(UiEvent::SpinClicked)),
        "copy" => Some(Command::Event(UiEvent::CopyReferralClicked)),
        "withdraw" => Some(Command::Event(UiEvent::WithdrawClicked)),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

/// Reads input lines until EOF or `quit`. A line answers the open prompt if
/// there is one, otherwise it is parsed as a command.
pub async fn route_input<R>(
    reader: R,
    pending: PendingPrompt,
    events: mpsc::Sender<UiEvent>,
    console: Console,
) -> Result<(), anyhow::Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if let Some(reply) = pending.take() {
            let _ = reply.send(line);
            continue;
        }

        match parse_command(&line) {
            Some(Command::Event(event)) => events.send(event).await?,
            Some(Command::Quit) => break,
            None if line.trim().is_empty() => {}
            None => console.line("Commands: spin, copy, withdraw, quit"),
        }
    }

    pending.cancel();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_command(" Spin "),
            Some(Command::Event(UiEvent::SpinClicked))
        );
        assert_eq!(
            parse_command("copy"),
            Some(Command::Event(UiEvent::CopyReferralClicked))
        );
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("dance"), None);
    }

    #[test]
    fn static_host_without_user_fields_is_anonymous() {
        assert!(StaticHost::new(&settings::Host::default()).user().is_none());

        let host = StaticHost::new(&settings::Host {
            user_id: Some(9),
            username: None,
            first_name: Some("Ada".to_string()),
        });
        assert_eq!(host.user().unwrap().id, Some(9));
    }

    #[tokio::test]
    async fn test_input_answers_open_prompt_before_commands() {
        let buffer = Buffer::default();
        let console = Console::new(Box::new(buffer.clone()));
        let pending = PendingPrompt::default();
        let dialog = TerminalDialog::new(console.clone(), pending.clone());
        let (events_tx, mut events_rx) = mpsc::channel(8);

        let answer = tokio::spawn(async move { dialog.prompt("UPI?").await });
        while pending.reply.lock().unwrap().is_none() {
            tokio::task::yield_now().await;
        }

        let input: &[u8] = b"spin\nwithdraw\nquit\ncopy\n";
        route_input(input, pending, events_tx, console).await.unwrap();

        assert_eq!(answer.await.unwrap(), Some("spin".to_string()));
        assert_eq!(events_rx.recv().await, Some(UiEvent::WithdrawClicked));
        assert_eq!(events_rx.recv().await, None);
        assert!(buffer.text().contains("? UPI?"));
    }

    #[tokio::test]
    async fn test_eof_dismisses_prompt() {
        let console = Console::new(Box::new(Buffer::default()));
        let pending = PendingPrompt::default();
        let dialog = TerminalDialog::new(console.clone(), pending.clone());
        let (events_tx, _events_rx) = mpsc::channel(8);

        let answer = tokio::spawn(async move { dialog.prompt("UPI?").await });
        while pending.reply.lock().unwrap().is_none() {
            tokio::task::yield_now().await;
        }

        let input: &[u8] = b"";
        route_input(input, pending, events_tx, console).await.unwrap();

        assert_eq!(answer.await.unwrap(), None);
    }
}

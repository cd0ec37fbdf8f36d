use std::{
    io::Write,
    ops::Deref,
    sync::{Mutex, PoisonError},
    thread::JoinHandle,
};

use crossbeam_channel::{Sender, unbounded};

use crate::severity::Severity;

/// Message consumed by the stderr echo thread.
#[derive(Debug, Clone)]
pub enum EchoMessage {
    /// A formatted line, tag byte included.
    Line(String),
    Shutdown,
}

/// Handle to the stderr echo thread. Shuts the thread down when dropped.
pub struct EchoSender {
    sender: Sender<EchoMessage>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl Deref for EchoSender {
    type Target = Sender<EchoMessage>;
    fn deref(&self) -> &Self::Target {
        &self.sender
    }
}

impl Drop for EchoSender {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl EchoSender {
    pub fn new(sender: Sender<EchoMessage>, handler: JoinHandle<()>) -> Self {
        Self {
            sender,
            handler: Mutex::new(Some(handler)),
        }
    }

    /// Drains pending lines and joins the thread. Later calls do nothing.
    pub fn shutdown(&self) {
        let mut guard = self.handler.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = guard.take() {
            // The thread may already be gone; nothing left to drain then.
            let _ = self.sender.send(EchoMessage::Shutdown);
            let _ = handle.join();
        }
    }
}

/// Mirrors formatted lines to the console, stderr by default.
///
/// The default writer colours the severity tag; a writer given to
/// [`LogStderr::new`] receives the lines verbatim.
pub struct LogStderr {
    writer: Box<dyn Write + Send>,
    colored: bool,
}

impl Default for LogStderr {
    fn default() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            colored: true,
        }
    }
}

impl LogStderr {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
            colored: false,
        }
    }

    pub fn line(&mut self, line: &str) {
        let written = match line.split_at_checked(1) {
            Some((tag, rest)) if self.colored => {
                let severity = Severity::from_tag(tag.as_bytes()[0]);
                write!(self.writer, "{}{rest}", severity.colored_tag())
            }
            _ => self.writer.write_all(line.as_bytes()),
        };
        let _ = written.and_then(|()| self.writer.flush());
    }
}

pub fn spawn_echo_thread(mut writer: LogStderr) -> EchoSender {
    let (sender, receiver) = unbounded::<EchoMessage>();
    let handler = std::thread::spawn(move || {
        while let Ok(message) = receiver.recv() {
            match message {
                EchoMessage::Line(line) => writer.line(&line),
                EchoMessage::Shutdown => break,
            }
        }
        let _ = writer.writer.flush();
    });
    EchoSender::new(sender, handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_echo_thread_keeps_order() {
        let buf = SharedBuf::default();
        let sender = spawn_echo_thread(LogStderr::new(buf.clone()));
        let lines: Vec<String> = (0..100)
            .map(|i| format!("{}0101 00:00:00.000000       1 echo.rs:{i}] line {i}\n", ["I", "W", "E", "F"][i % 4]))
            .collect();
        for line in &lines {
            sender.send(EchoMessage::Line(line.clone())).unwrap();
        }
        sender.shutdown();
        assert_eq!(buf.contents(), lines.concat());
    }

    #[test]
    fn test_echo_thread_shutdown() {
        let buf = SharedBuf::default();
        let sender = spawn_echo_thread(LogStderr::new(buf.clone()));
        sender.send(EchoMessage::Line("Ihello\n".into())).unwrap();
        sender.shutdown();
        sender.shutdown();
        assert!(sender.send(EchoMessage::Line("Ilate\n".into())).is_err());
        assert_eq!(buf.contents(), "Ihello\n");
    }

    #[test]
    fn test_plain_writer_is_verbatim() {
        let buf = SharedBuf::default();
        let mut writer = LogStderr::new(buf.clone());
        writer.line("");
        writer.line("é not a tag\n");
        writer.line("Fshort\n");
        writer.line("?untagged\n");
        assert_eq!(buf.contents(), "é not a tag\nFshort\n?untagged\n");
    }

    #[test]
    fn test_colored_writer_keeps_tag_and_rest() {
        let buf = SharedBuf::default();
        let mut writer = LogStderr {
            writer: Box::new(buf.clone()),
            colored: true,
        };
        writer.line("Eboom\n");
        writer.line("é not a tag\n");
        writer.line("");
        let out = buf.contents();
        let (first, second) = out.split_once('\n').unwrap();
        // Colouring may wrap the tag in escape codes, never the rest.
        assert!(first.contains('E') && first.ends_with("boom"), "{out:?}");
        assert_eq!(second, "é not a tag\n");
    }
}

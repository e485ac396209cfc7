//! # Interactive console loop.
//!
//! Lets an operator drive a service from a terminal with three keys:
//!
//! ```text
//! P / p → pause()   → "Workers paused."
//! R / r → resume()  → "Workers resumed."
//! Q / q → stop()    → drain, then return
//! EOF   → treated as Q
//! other → ignored, prompt again
//! ```
//!
//! Input and output are generic ([`AsyncBufRead`] / [`AsyncWrite`]) so the
//! loop runs the same against stdio and in-memory buffers.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

use crate::core::ServiceOrchestrator;
use crate::error::ServiceError;

const PROMPT: &str = "Enter [P]ause, [R]esume, or [Q]uit.";

/// One console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Pause,
    Resume,
}

impl Command {
    /// Parses a single-key line (`q`, `p` or `r`, case-insensitive).
    ///
    /// Surrounding whitespace is ignored; anything longer than one key is not a command.
    pub fn parse(line: &str) -> Option<Self> {
        let mut keys = line.trim().chars();
        let key = keys.next()?;
        if keys.next().is_some() {
            return None;
        }
        match key.to_ascii_lowercase() {
            'q' => Some(Command::Quit),
            'p' => Some(Command::Pause),
            'r' => Some(Command::Resume),
            _ => None,
        }
    }
}

/// Reads commands and applies them to a service until Quit.
pub struct CommandLoop<R, W> {
    input: R,
    output: W,
}

impl CommandLoop<BufReader<Stdin>, Stdout> {
    /// Console loop over the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> CommandLoop<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Runs the loop. Returns after Quit (or end of input) once `svc` has drained.
    pub async fn run(mut self, svc: &ServiceOrchestrator) -> Result<(), ServiceError> {
        let mut line = String::new();
        loop {
            self.say(PROMPT).await?;

            line.clear();
            let command = if self.input.read_line(&mut line).await? == 0 {
                Command::Quit
            } else {
                match Command::parse(&line) {
                    Some(command) => command,
                    None => continue,
                }
            };

            match command {
                Command::Quit => {
                    self.say("Stop signaled.").await?;
                    return svc.stop().await;
                }
                Command::Pause => match svc.pause() {
                    Ok(()) => self.say("Workers paused.").await?,
                    Err(e) => tracing::warn!(error = %e, "pause rejected"),
                },
                Command::Resume => match svc.resume() {
                    Ok(()) => self.say("Workers resumed.").await?,
                    Err(e) => tracing::warn!(error = %e, "resume rejected"),
                },
            }
        }
    }

    async fn say(&mut self, text: &str) -> std::io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, ServiceState};
    use crate::error::WorkError;
    use crate::work::{WorkContext, WorkFn};
    use std::time::Duration;

    #[test]
    fn parse_accepts_single_keys_only() {
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("  P  "), Some(Command::Pause));
        assert_eq!(Command::parse("R\n"), Some(Command::Resume));
        assert_eq!(Command::parse("x"), None);
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("pxyz"), None);
        assert_eq!(Command::parse("Pause please"), None);
        assert_eq!(Command::parse("quit"), None);
    }

    async fn started() -> ServiceOrchestrator {
        let work = WorkFn::arc(|_ctx: WorkContext| async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok::<_, WorkError>(())
        });
        let svc = ServiceOrchestrator::builder(Config {
            poll_interval: Duration::from_millis(5),
            ..Config::default()
        })
        .pooled("console", work)
        .build()
        .unwrap();
        svc.start(&[]).await.unwrap();
        svc
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn pause_resume_quit() {
        let svc = started().await;
        let mut out = Vec::new();

        CommandLoop::new(&b"p\nx\nR\nq\n"[..], &mut out)
            .run(&svc)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Workers paused."));
        assert!(text.contains("Workers resumed."));
        assert_eq!(text.matches(PROMPT).count(), 4);
        assert_eq!(svc.state(), ServiceState::Stopped);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn end_of_input_quits_and_drains() {
        let svc = started().await;
        let mut out = Vec::new();

        CommandLoop::new(&b"p\n"[..], &mut out).run(&svc).await.unwrap();

        assert_eq!(svc.state(), ServiceState::Stopped);
        assert!(svc.workers().iter().all(|w| w.has_completed()));
    }
}

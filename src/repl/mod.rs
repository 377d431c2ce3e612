//! Terminal shell
//!
//! A single-threaded event loop over three sources: input lines, completed
//! search dispatches and (optionally) keep-alive ticks. Queries are
//! dispatched without waiting, so a new line can be submitted while an
//! earlier one is still in flight; completions are applied in arrival order.

use crate::config::{OutputFormat, Settings};
use crate::network::SearchTransport;
use crate::search::{Dispatch, SearchController, SearchError, SearchResponse, ServiceStatus};
use crate::view::ResultRenderer;
use anyhow::Result;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::Interval;
use tracing::{debug, info, warn};

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Ping,
    Stats,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.strip_prefix(':') {
            Some("q") | Some("quit") | Some("exit") => Command::Quit,
            Some("ping") => Command::Ping,
            Some("stats") => Command::Stats,
            Some("h") | Some("help") => Command::Help,
            Some(other) => Command::Unknown(other.to_string()),
            None => Command::Search(line.to_string()),
        }
    }
}

const HELP: &str = "Type a research interest and press enter.
  :ping    check whether the search service is awake
  :stats   show search counters
  :quit    exit";

type Completion = (Dispatch, Result<SearchResponse, SearchError>);
type Probe = (bool, Result<ServiceStatus, SearchError>);

/// Interactive shell state
pub struct Repl {
    controller: SearchController,
    renderer: ResultRenderer,
    transport: Arc<dyn SearchTransport>,
    format: OutputFormat,
    keep_alive: Option<Duration>,
}

impl Repl {
    pub fn new(
        settings: &Settings,
        controller: SearchController,
        transport: Arc<dyn SearchTransport>,
    ) -> Result<Self> {
        Ok(Self {
            controller,
            renderer: ResultRenderer::new(&settings.ui)?,
            transport,
            format: settings.ui.format,
            keep_alive: settings
                .service
                .keep_alive_interval
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        })
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    /// Run until `:quit`, or until input ends and every dispatch and probe
    /// has landed
    pub async fn run<R, W>(&mut self, mut input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        // Partial reads accumulate here across select! iterations
        let mut buf = Vec::new();
        let mut input_open = true;
        let mut pending: FuturesUnordered<BoxFuture<'static, Completion>> = FuturesUnordered::new();
        let mut probes: FuturesUnordered<BoxFuture<'static, Probe>> = FuturesUnordered::new();
        let mut keep_alive = self.keep_alive.map(tokio::time::interval);

        loop {
            if !input_open && pending.is_empty() && probes.is_empty() {
                break;
            }

            tokio::select! {
                read = input.read_until(b'\n', &mut buf), if input_open => {
                    match read {
                        Ok(0) => {
                            debug!("Input closed, waiting for {} dispatch(es)", pending.len());
                            input_open = false;
                            if buf.is_empty() {
                                continue;
                            }
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!("Input failed, waiting for {} dispatch(es): {}", pending.len(), e);
                            input_open = false;
                            continue;
                        }
                    }
                    let Some(line) = take_line(&mut buf, out)? else {
                        continue;
                    };
                    match Command::parse(&line) {
                        Command::Quit => break,
                        Command::Search(query) => {
                            self.controller.set_query(query);
                            if let Ok(dispatch) = self.controller.begin_submit() {
                                self.show(out)?;
                                pending.push(self.dispatch(dispatch));
                            }
                        }
                        Command::Ping => probes.push(self.probe(true)),
                        Command::Stats => {
                            writeln!(out, "{}", self.controller.metrics().snapshot())?;
                        }
                        Command::Help => writeln!(out, "{}", HELP)?,
                        Command::Unknown(cmd) => {
                            writeln!(out, "unknown command :{} (try :help)", cmd)?;
                        }
                    }
                }
                Some((dispatch, outcome)) = pending.next(), if !pending.is_empty() => {
                    self.controller.complete(dispatch, outcome);
                    self.show(out)?;
                }
                Some((verbose, status)) = probes.next(), if !probes.is_empty() => {
                    report_probe(verbose, status, out)?;
                }
                _ = tick(&mut keep_alive) => {
                    debug!("Keep-alive probe");
                    probes.push(self.probe(false));
                }
            }
        }

        Ok(())
    }

    fn dispatch(&self, dispatch: Dispatch) -> BoxFuture<'static, Completion> {
        let transport = self.transport.clone();
        async move {
            let outcome = transport.search(&dispatch.request).await;
            (dispatch, outcome)
        }
        .boxed()
    }

    fn probe(&self, verbose: bool) -> BoxFuture<'static, Probe> {
        let transport = self.transport.clone();
        async move { (verbose, transport.health().await) }.boxed()
    }

    fn show<W: Write>(&self, out: &mut W) -> Result<()> {
        let view = self.renderer.view(&self.controller);
        let rendered = self.renderer.render(&view, self.format)?;
        let rendered = rendered.trim_end();
        if !rendered.is_empty() {
            writeln!(out, "{}", rendered)?;
        }
        Ok(())
    }
}

/// Drain one line from `buf`, without its line ending. Lines that are not
/// UTF-8 are reported and skipped.
fn take_line<W: Write>(buf: &mut Vec<u8>, out: &mut W) -> Result<Option<String>> {
    let mut bytes = std::mem::take(buf);
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
    }

    match String::from_utf8(bytes) {
        Ok(line) => Ok(Some(line)),
        Err(e) => {
            warn!("Skipping input line: {}", e);
            writeln!(out, "input is not valid UTF-8")?;
            Ok(None)
        }
    }
}

fn report_probe<W: Write>(
    verbose: bool,
    status: Result<ServiceStatus, SearchError>,
    out: &mut W,
) -> Result<()> {
    match status {
        Ok(status) if status.is_online() => {
            info!("Search service is awake");
            if verbose {
                let message = status.message.as_deref().unwrap_or("online");
                writeln!(out, "service: {}", message)?;
            }
        }
        Ok(status) => {
            warn!("Search service answered HTTP {}", status.status);
            if verbose {
                writeln!(out, "service: HTTP {}, it may still be warming up", status.status)?;
            }
        }
        Err(e) => {
            warn!("Search service probe failed: {}", e);
            if verbose {
                writeln!(out, "service: {}", e)?;
            }
        }
    }
    Ok(())
}

async fn tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

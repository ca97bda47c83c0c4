//! Replay command implementation.
//!
//! Opens a page from a site directory in a [`HeadlessBrowser`], enables a
//! navigator over it and runs a scripted list of steps, printing every
//! lifecycle event as it happens.

use std::fs;
use std::io::{Write, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use glide::events::Notice;
use glide::headless::{HeadlessBrowser, SiteFetcher};
use glide::host::{Anchor, ClickEvent, Dom, HistoryApi};
use glide::nav::{ClickOutcome, NavError, Navigator, PopStateOutcome};
use glide::{debug, log, logger};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};

use super::{Cli, ReplayArgs, load_config};

type Browser = HeadlessBrowser<SiteFetcher>;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Click(String),
    Back,
    Preload(String),
}

impl Step {
    fn parse(raw: &str) -> Self {
        match raw {
            "back" => Self::Back,
            _ => match raw.strip_prefix("preload:") {
                Some(href) => Self::Preload(href.to_string()),
                None => Self::Click(raw.to_string()),
            },
        }
    }
}

/// Final position, printed after the last step.
#[derive(Debug, Serialize)]
struct Summary {
    location: String,
    title: String,
    history_len: usize,
}

pub async fn run_replay(cli: &Cli, args: &ReplayArgs) -> Result<()> {
    if args.json {
        logger::set_quiet(true);
    }
    let config = load_config(cli, &args.root)?;
    let replay = &config.replay;

    let latency = Duration::from_millis(args.latency.unwrap_or(replay.latency_ms));
    let fetcher = SiteFetcher::new(&args.root)
        .with_fail_paths(&replay.fail_paths)
        .with_latency(latency);

    let start = args.start.as_deref().unwrap_or(&replay.start);
    let file = fetcher
        .resolve(start)
        .with_context(|| format!("no page for `{}` under {}", start, args.root.display()))?;
    let html = fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let origin = replay.origin.trim_end_matches('/');
    let start_url = format!("{}/{}", origin, start.trim_start_matches('/'));
    let browser = HeadlessBrowser::open(&start_url, &html, fetcher)
        .with_context(|| format!("invalid start url `{start_url}`"))?;

    let nav = Navigator::builder(browser)
        .config(config.nav.clone().with_origin(origin))
        .build()?;
    let mut notices = nav.events().subscribe();
    let printer = Printer { json: args.json };

    nav.enable();
    printer.drain(&mut notices);

    for raw in &args.steps {
        let step = Step::parse(raw);
        debug!("replay"; "{:?}", step);
        run_step(&nav, &step).await?;
        deliver_popstates(&nav).await?;
        printer.drain(&mut notices);
    }

    let host = nav.host();
    printer.summary(&Summary {
        location: host.location(),
        title: host.title(),
        history_len: host.history_len(),
    });
    Ok(())
}

async fn run_step(nav: &Navigator<Browser>, step: &Step) -> Result<()> {
    match step {
        Step::Click(href) => {
            let anchor = nav
                .host()
                .find_link(&nav.config().link_selector, href)
                .unwrap_or_else(|| {
                    debug!("replay"; "no link to {} on page, using a synthetic one", href);
                    Anchor::new(href.as_str())
                });
            match nav.handle_click(&ClickEvent::primary(anchor)) {
                ClickOutcome::Navigating(handle) => report(handle.await?),
                outcome => debug!("replay"; "click on {}: {:?}", href, outcome),
            }
        }
        Step::Back => nav.host().go(-1),
        Step::Preload(href) => {
            let route = nav.preload(href).wait().await.map(|page| page.url.clone());
            match route {
                Ok(url) => debug!("replay"; "preloaded {}", url),
                Err(err) => log!("warning"; "preload failed: {}", err),
            }
        }
    }
    Ok(())
}

/// Feed queued popstates back into the navigator until history settles.
async fn deliver_popstates(nav: &Navigator<Browser>) -> Result<()> {
    while let Some(event) = nav.host().take_popstate() {
        match nav.handle_popstate(&event) {
            PopStateOutcome::Navigating(handle) => report(handle.await?),
            PopStateOutcome::Reload(url) => log!("replay"; "full reload of {}", url),
            PopStateOutcome::Ignored => debug!("replay"; "popstate ignored"),
        }
    }
    Ok(())
}

fn report(result: Result<(), NavError>) {
    // The navigator already logged the failure; only note the rollback
    if let Err(err) = result {
        debug!("replay"; "rolled back from {}", err.url());
    }
}

// =============================================================================
// Output
// =============================================================================

struct Printer {
    json: bool,
}

impl Printer {
    /// Print every notice broadcast since the last drain.
    fn drain(&self, notices: &mut broadcast::Receiver<Notice>) {
        loop {
            match notices.try_recv() {
                Ok(notice) => self.notice(&notice),
                Err(TryRecvError::Lagged(missed)) => {
                    log!("warning"; "{} events were dropped", missed);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    fn notice(&self, notice: &Notice) {
        if self.json {
            print_json(notice);
        } else {
            log!("event"; "{}", notice.event);
        }
    }

    fn summary(&self, summary: &Summary) {
        if self.json {
            print_json(summary);
        } else {
            log!("replay"; "at {} \"{}\" ({} history entries)",
                summary.location, summary.title, summary.history_len);
        }
    }
}

fn print_json(value: &impl Serialize) {
    match serde_json::to_string(value) {
        Ok(line) => {
            let mut out = stdout().lock();
            writeln!(out, "{line}").ok();
        }
        Err(err) => log!("error"; "failed to serialize output: {}", err),
    }
}

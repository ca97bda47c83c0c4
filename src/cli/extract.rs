//! Extract command implementation.
//!
//! Shows what a navigator would take from an HTML file: the title, the
//! container blocks and how long each animated element takes to settle.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use glide::animation::{AnimationResolver, TimingCapabilities};
use glide::extract::{Extractor, HtmlExtractor};
use glide::headless::{HeadlessBrowser, StaticFetcher};
use glide::host::{Dom, ElementId};
use glide::log;
use glide::selector::Selector;

use super::{Cli, ExtractArgs, load_config};

pub fn run_extract(cli: &Cli, args: &ExtractArgs) -> Result<()> {
    let dir = args.file.parent().unwrap_or(Path::new("."));
    let config = load_config(cli, dir)?;
    let html = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let sources = if args.containers.is_empty() {
        &config.nav.containers
    } else {
        &args.containers
    };
    let containers = sources
        .iter()
        .map(|s| Selector::parse(s))
        .collect::<Result<Vec<_>, _>>()?;

    let Some(data) = HtmlExtractor.extract(&html, &containers) else {
        bail!("{} could not be parsed", args.file.display());
    };
    log!("title"; "{}", data.title);
    if data.blocks.is_empty() {
        log!("warning"; "no swappable blocks, navigations to this page will fail");
    }
    for (index, block) in data.blocks.iter().enumerate() {
        log!("block"; "#{} ({} bytes)", index, block.len());
        println!("{block}");
    }

    let browser = HeadlessBrowser::open("http://localhost/", &html, StaticFetcher::new())?;
    let resolver = AnimationResolver::new(TimingCapabilities::detect(&browser));
    let selector = &config.nav.animation_selector;
    let animated = browser.query_all(selector);
    if animated.is_empty() {
        log!("timing"; "nothing matches {}", selector);
    }
    for element in animated {
        let info = resolver.timing_info(&browser, element);
        let label = describe(&browser, element);
        match info.kind {
            Some(kind) => log!(
                "timing";
                "{}: {:?}, {}ms, {} end event(s)",
                label, kind, info.timeout, info.prop_count
            ),
            None => log!("timing"; "{}: not animated", label),
        }
    }
    Ok(())
}

/// `#id`, `.class.list`, or the numeric handle when neither exists.
fn describe<F>(browser: &HeadlessBrowser<F>, element: ElementId) -> String {
    if let Some(id) = browser.attr(element, "id") {
        return format!("#{id}");
    }
    match browser.attr(element, "class") {
        Some(class) if !class.trim().is_empty() => {
            format!(".{}", class.split_whitespace().collect::<Vec<_>>().join("."))
        }
        _ => format!("element {}", element.0),
    }
}

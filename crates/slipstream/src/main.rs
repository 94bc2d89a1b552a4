//! Command-line shell for the transition router.
//!
//! Loads a start page over HTTP, wires up the router with a trivial
//! demonstration module, and optionally drives one transition:
//!
//! ```text
//! slipstream <start-url> [next-url]
//! ```

use anyhow::{Error, anyhow};
use dom::Document;
use log::info;
use router::fetch::{HttpTransport, Transport as _};
use router::platform::TokioPlatform;
use router::scripts::{BehaviorModule, Cleanup, ScriptRegistry, SetupContext, StaticLoader};
use router::{NavigationOutcome, Router, RouterConfig};
use std::env;
use std::rc::Rc;
use tokio::runtime::Builder;
use tokio::task::LocalSet;
use url::Url;

/// Demonstration module for the implicit top-level layout: logs its own
/// lifecycle so transitions are visible on the console.
struct LayoutShell;

impl BehaviorModule for LayoutShell {
    fn setup(&self, ctx: &mut SetupContext<'_>) -> Option<Cleanup> {
        info!("layout shell active");
        ctx.on_loading(|| {
            info!("navigation is taking a while...");
            Some(Box::new(|| info!("...there it is")) as Cleanup)
        });
        Some(Box::new(|| info!("layout shell torn down")))
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let start = args
        .next()
        .ok_or_else(|| anyhow!("usage: slipstream <start-url> [next-url]"))?;
    let next = args.next();

    let runtime = Builder::new_current_thread().enable_all().build()?;
    let local = LocalSet::new();
    runtime.block_on(local.run_until(run(&start, next.as_deref())))
}

async fn run(start: &str, next: Option<&str>) -> Result<(), Error> {
    let base = Url::parse(start)?;
    let config = RouterConfig::from_env();
    let transport = Rc::new(HttpTransport);
    let platform = Rc::new(TokioPlatform::new(config.frame_budget()));

    let body = transport.fetch_text(&base).await?;
    let live = Document::parse(&body);
    info!("loaded {} ({:?})", base, live.title());

    let mut registry = ScriptRegistry::new();
    registry.register_module(
        config.layout_prefix.clone(),
        StaticLoader::new(Rc::new(LayoutShell)),
    );

    let router = Router::new(
        live,
        base,
        registry,
        transport,
        Rc::clone(&platform) as Rc<dyn router::platform::Platform>,
        config,
    );
    router.start().await;

    if let Some(next) = next {
        let target = Url::parse(next)?;
        let outcome = router.on_link_activated(&target).await?;
        info!(
            "navigated to {} -> {:?}, title now {:?}",
            target,
            outcome,
            router.document().title()
        );
        if outcome == NavigationOutcome::Completed {
            info!("history: {:?}", platform.history());
        }
    }
    Ok(())
}

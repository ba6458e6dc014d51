//! `mimicgen watch` - keep printing regenerated values.

use anyhow::Result;
use mimic_core::MimicSettings;
use mimic_gen::Regenerator;
use tokio::sync::mpsc;
use tracing::info;

use super::{entropy, Context};
use crate::cli::args::WatchArgs;
use crate::output::render_result;

pub async fn execute(ctx: &Context, args: WatchArgs) -> Result<()> {
    let settings = watch_settings(ctx.store.load(args.mimic_type)?, args.interval);
    let mimic_type = settings.mimic_type;
    let limit = args.count.unwrap_or(usize::MAX);

    let entropy = entropy(args.seed);

    // The first value is produced here; the regenerator only supplies refreshes.
    let initial = mimic_gen::generate_with(&settings, entropy.as_ref())?;
    println!("{}", render_result(ctx.output_format, mimic_type, &initial)?);
    let mut printed = 1;
    if printed >= limit {
        return Ok(());
    }

    let (tx, mut rx) = mpsc::channel(4);
    let regenerator = Regenerator::spawn(settings, entropy, tx);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let outcome: Result<()> = loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(Ok(result)) => {
                    println!("{}", render_result(ctx.output_format, mimic_type, &result)?);
                    printed += 1;
                    if printed >= limit {
                        break Ok(());
                    }
                }
                Some(Err(e)) => break Err(e.into()),
                None => break Ok(()),
            },
            _ = &mut ctrl_c => {
                info!("interrupted after {printed} results");
                break Ok(());
            }
        }
    };

    regenerator.stop().await;
    outcome
}

/// Stored settings clamped to their valid ranges, then the `--interval`
/// override. An explicit interval is taken as given; the regenerator
/// still waits at least one second.
fn watch_settings(stored: MimicSettings, interval: Option<u32>) -> MimicSettings {
    let mut settings = stored.coerce_ranges();
    if let Some(interval) = interval {
        settings.regenerate_interval_seconds = interval;
    }
    settings
}

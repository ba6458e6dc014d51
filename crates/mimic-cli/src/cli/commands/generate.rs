//! `mimicgen generate` - one set of junk-field values.

use anyhow::Result;
use colored::Colorize;
use tracing::info;

use super::{entropy, Context};
use crate::cli::args::GenerateArgs;
use crate::output::{render_result, OutputFormat};

pub fn execute(ctx: &Context, args: GenerateArgs) -> Result<()> {
    let mut settings = ctx.store.load(args.mimic_type)?;
    args.overrides.apply(&mut settings);
    let settings = settings.coerce_ranges();

    if args.save {
        let path = ctx.store.save(&settings)?;
        info!(path = %path.display(), "saved {} settings", settings.mimic_type);
        if ctx.output_format == OutputFormat::Text {
            eprintln!("{} settings saved to {}", "Success:".green().bold(), path.display());
        }
    }

    let entropy = entropy(args.seed);
    let result = match mimic_gen::generate_with(&settings, entropy.as_ref()) {
        Err(e) if e.is_user_error() => anyhow::bail!(
            "{e}\n\n\
             Pass --domain <DOMAIN> or store one with:\n  \
             mimicgen settings set dns domain <DOMAIN>"
        ),
        result => result?,
    };

    println!(
        "{}",
        render_result(ctx.output_format, settings.mimic_type, &result)?
    );
    Ok(())
}

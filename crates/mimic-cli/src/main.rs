//! mimicgen - decoy traffic generator for obfuscated WireGuard tunnels
//!
//! Prints DNS, QUIC and SIP junk-field values ready for a tunnel config.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    mimic_cli::run().await
}

//! Vérifie l'état d'abonnement d'un lecteur
//!
//! Les credentials éditeur sont lus depuis pcsconfig (`publink.pubcode`,
//! `publink.password`), ou depuis l'environnement :
//!
//! Usage:
//! ```bash
//! PCS_CONFIG__PUBLINK__PUBCODE=PUB PCS_CONFIG__PUBLINK__PASSWORD=secret \
//!     cargo run --example check_subscriber -- reader@example.com [password] [v1|v2]
//! ```

use pcsclient::{ApiVersion, PublinkConfigExt, SubscriptionStatus, connect_from_config};
use pcsconfig::try_get_config;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = try_get_config()?;

    let min_level = config.get_log_min_level()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(min_level)),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let email = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: check_subscriber <email> [password] [v1|v2]"))?;
    let password = args.next();
    let version = match args.next().as_deref() {
        Some("v2") => ApiVersion::V2,
        _ => ApiVersion::V1,
    };

    let endpoint = config.get_publink_endpoint(version)?;
    println!("=== {} ({}) ===\n", version, endpoint.url());

    let client = connect_from_config(version)?;

    if let Some(password) = password {
        let active = client.is_user_active(&email, &password)?;
        println!("Actif: {}", active);
    }

    match client.customer_number(&email) {
        Ok(number) => {
            println!("Numéro client: {}", number);
            let info = client.user_info_by_customer_number(&number)?;
            println!("{}", serde_yaml::to_string(&info)?);
        }
        Err(e) if e.is_service_error() => println!("Refusé: {}", e),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

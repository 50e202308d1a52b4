//! Command-line view of the formation catalog.
//!
//! Lists every formation, and with a formation id argument reserves a seat
//! for the participant given by `PARTICIPANT_ID`.
//!
//! ```text
//! formations          # list
//! formations 42       # list, then participate in formation 42
//! ```

use anyhow::Context;
use formations::catalog::{CatalogEnvironment, CatalogStatus, CatalogStore};
use formations::config::Config;
use formations::types::{Delivery, Formation, FormationId};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "formations={level},portal_runtime={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let formation_id = std::env::args()
        .nth(1)
        .map(|arg| {
            arg.parse::<i64>()
                .map(FormationId::new)
                .with_context(|| format!("invalid formation id: {arg}"))
        })
        .transpose()?;

    tracing::info!(base_url = %config.service.base_url, "Starting formation catalog");

    let env = CatalogEnvironment::from_config(&config).context("building HTTP clients")?;
    let store = CatalogStore::new(env);
    // Leave room for the HTTP timeout to fire first.
    let wait = config.request_timeout() + Duration::from_secs(1);

    match store.initialize(wait).await.context("loading formations")? {
        CatalogStatus::Failed { error } => eprintln!("Formations unavailable: {error}"),
        _ => {
            let formations = store.state(|s| s.formations.clone()).await;
            println!("{} formation(s)\n", formations.len());
            for formation in &formations {
                print_formation(formation);
            }
        },
    }

    if let Some(formation_id) = formation_id {
        store
            .participate(formation_id, wait)
            .await
            .context("submitting reservation")?;

        for notification in store.take_notifications().await {
            println!("{notification}");
        }
    }

    Ok(())
}

fn print_formation(formation: &Formation) {
    let category = formation
        .category
        .as_ref()
        .map_or_else(String::new, |c| format!(" [{}]", c.name));
    let delivery = match formation.delivery() {
        Delivery::Online { meeting_link } => format!("en ligne {}", meeting_link.unwrap_or("")),
        Delivery::InPerson { location } => format!("présentiel {}", location.unwrap_or("")),
    };

    println!("#{} {}{}", formation.id, formation.title, category);
    println!("    {} -> {} | {}", formation.start_date, formation.end_date, delivery.trim_end());
    if !formation.description.is_empty() {
        println!("    {}", formation.description);
    }
}

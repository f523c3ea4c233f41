//! Key Cache demo
//!
//! Mirrors a couple of sample records into the in-memory store and prints
//! what ends up in it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use key_cache::{BindingBuilder, BindingRegistry, Config, LifecycleEvent, MemoryStore, Record};

/// Account profile, mirrored as one scalar per account.
struct Profile {
    account_id: String,
    tier: String,
}

impl Record for Profile {
    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "account_id" => Some(self.account_id.clone()),
            "tier" => Some(self.tier.clone()),
            _ => None,
        }
    }
}

/// Team seat, mirrored as a field of the team's hash while not soft-deleted.
struct Seat {
    team_id: u64,
    user: String,
    role: String,
    deleted_at: Option<DateTime<Utc>>,
}

impl Record for Seat {
    const SOFT_DELETE: bool = true;

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "team_id" => Some(self.team_id.to_string()),
            "user" => Some(self.user.clone()),
            "role" => Some(self.role.clone()),
            _ => None,
        }
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "key_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, max_key_length={}, max_value_size={}",
        config.max_entries, config.max_key_length, config.max_value_size
    );
    let store = Arc::new(MemoryStore::from_config(&config));

    let profiles = BindingRegistry::<Profile>::new(store.clone()).bind(
        BindingBuilder::scalar()
            .name("profile_tier")
            .key("profile/:account_id")
            .value("tier"),
    );
    let seats = BindingRegistry::<Seat>::new(store.clone()).bind(
        BindingBuilder::hash()
            .name("team_roles")
            .key("team/:team_id/roles")
            .field("user")
            .value("role"),
    );

    let profile = Profile {
        account_id: "42".to_string(),
        tier: "gold".to_string(),
    };
    profiles.dispatch(LifecycleEvent::Saved, &profile)?;

    let mut seats_on_team = vec![
        Seat {
            team_id: 7,
            user: "alice".into(),
            role: "admin".into(),
            deleted_at: None,
        },
        Seat {
            team_id: 7,
            user: "bob".into(),
            role: "viewer".into(),
            deleted_at: None,
        },
    ];
    for seat in &seats_on_team {
        seats.after_update(None, seat)?;
    }

    // Soft-delete bob: his field leaves the team hash
    let bob = &mut seats_on_team[1];
    let previous = bob.deleted_at;
    bob.deleted_at = Some(Utc::now());
    seats.after_update(previous, bob)?;

    let tier = profiles
        .scalar("profile_tier")
        .ok_or_else(|| anyhow::anyhow!("profile_tier binding missing"))?;
    let roles = seats
        .hash("team_roles")
        .ok_or_else(|| anyhow::anyhow!("team_roles binding missing"))?;
    let alice = &seats_on_team[0];

    let report = json!({
        "profile": {
            "key": tier.key_template(),
            "redis_key": tier.redis_key(&profile)?,
            "value": tier.read(&profile)?,
        },
        "team": {
            "key": roles.key_template(),
            "redis_key": roles.redis_key(alice)?,
            "hash": roles.snapshot(alice)?,
        },
        "stats": store.stats()?,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    profiles.dispatch(LifecycleEvent::Destroyed, &profile)?;
    info!("Profile destroyed, {} keys left in store", store.len()?);

    Ok(())
}

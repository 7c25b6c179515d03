use anyhow::Context;
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use salonbook::config::AppConfig;
use salonbook::db::{self, queries};
use salonbook::models::{NewSchedule, NewService, NewStaff};

const SERVICES: &[(&str, &str, i32, i64)] = &[
    ("Classic Haircut", "Tailored cut, shampoo & style", 45, 800),
    ("Beard Trim", "Precision trim and shape", 20, 350),
    ("Hair Color - Global", "Single-process color", 120, 2500),
    ("Highlights", "Foil highlights, toner & style", 150, 3200),
    ("Blow Dry & Style", "Wash, blow dry, and style", 40, 600),
    ("Signature Facial", "Deep cleanse, exfoliation, mask", 60, 1500),
    ("Party Makeup", "Event-ready look", 90, 3000),
];

const STYLISTS: &[(&str, &[&str])] = &[
    ("Aarav", &["Cuts", "Fades", "Beard"]),
    ("Meera", &["Color", "Balayage", "Highlights"]),
    ("Riya", &["Skincare", "Makeup"]),
    ("Kabir", &["Classic cuts", "Styling"]),
];

fn seed(conn: &Connection) -> anyhow::Result<()> {
    let tx = conn.unchecked_transaction()?;
    queries::clear_catalog(&tx).context("failed to clear catalog")?;

    for (name, description, duration_minutes, price) in SERVICES {
        let svc = NewService {
            name: name.to_string(),
            description: Some(description.to_string()),
            duration_minutes: *duration_minutes,
            price: *price,
            active: true,
        };
        queries::insert_service(&tx, &uuid::Uuid::new_v4().to_string(), &svc)
            .with_context(|| format!("failed to insert service {name}"))?;
    }

    for (name, specialties) in STYLISTS {
        let staff = NewStaff {
            name: name.to_string(),
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
        };
        let staff = queries::insert_staff(&tx, &uuid::Uuid::new_v4().to_string(), &staff)
            .with_context(|| format!("failed to insert stylist {name}"))?;

        for day_of_week in 0..=6 {
            let schedule = NewSchedule {
                staff_id: Some(staff.id.clone()),
                day_of_week,
                open_time: "10:00".to_string(),
                close_time: "20:00".to_string(),
            };
            queries::insert_schedule(&tx, &uuid::Uuid::new_v4().to_string(), &schedule)
                .context("failed to insert schedule")?;
        }
    }

    tx.commit()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let conn = db::init_db(&config.database_url)?;
    seed(&conn)?;

    tracing::info!(
        services = SERVICES.len(),
        stylists = STYLISTS.len(),
        "seed complete"
    );
    Ok(())
}

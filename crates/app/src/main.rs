use engine::Session;

mod error;
mod report;
mod settings;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "billsplit={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(session = %settings.session, mode = ?settings.mode, "loading session");
    let session = load_session(&settings.session)?;
    tracing::info!(
        participants = session.participants.len(),
        expenses = session.expenses.len(),
        "session loaded"
    );

    let settlement = session.settle(settings.mode);
    if !settlement.total_imbalance().is_zero() {
        tracing::warn!(
            imbalance = %settlement.total_imbalance(),
            "some shared costs have no known payer"
        );
    }

    if settings.json {
        println!("{}", serde_json::to_string_pretty(&settlement)?);
    } else {
        print!("{}", report::render(&session, &settlement, settings.currency));
    }

    Ok(())
}

fn load_session(path: &str) -> error::Result<Session> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

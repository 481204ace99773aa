//! Torrington autopilot
//!
//! Plays one headless session to completion: every year it is offered a batch
//! of candidates, accepts the one with the best job outlook, declines the rest
//! and staffs the new programme. Notifications go to the tracing log and the
//! final summary is printed as JSON.

use torrington::config::Settings;
use torrington::{GameSession, InMemoryCatalog, Proposal, TracingObserver, TurnOutcome};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Torrington autopilot...");

    let settings = Settings::load()?;
    info!("Configuration loaded successfully");

    let catalog = match &settings.catalog.path {
        Some(path) => InMemoryCatalog::from_json_file(path)?,
        None => InMemoryCatalog::builtin(),
    };

    let mut session = GameSession::from_config(catalog, &settings.session);
    session.register_observer(TracingObserver);
    session.start()?;

    let final_ratios = loop {
        if session.remaining_count() > 0 {
            let candidates = session.draw_candidates(settings.session.candidates_per_visit)?;
            accept_best(&mut session, candidates)?;
        }

        match session.next_turn()? {
            TurnOutcome::Advanced { .. } => continue,
            TurnOutcome::Ended { ratios } => break ratios,
        }
    };

    info!(
        year = session.year(),
        satisfaction = final_ratios.satisfaction,
        "Autopilot finished"
    );
    println!("{}", serde_json::to_string_pretty(&session.summary())?);
    Ok(())
}

/// Keep the candidate with the most jobs per applicant and decline the others.
fn accept_best(
    session: &mut GameSession<InMemoryCatalog>,
    candidates: Vec<Proposal>,
) -> anyhow::Result<()> {
    let best_index = candidates
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| job_outlook(a).total_cmp(&job_outlook(b)))
        .map(|(index, _)| index);

    for (index, proposal) in candidates.into_iter().enumerate() {
        if Some(index) != best_index {
            session.decline_proposal(proposal)?;
            continue;
        }

        let id = proposal.id();
        let students = (proposal.candidates() / 4).clamp(1, Proposal::MAX_STUDENTS);
        let graduation = proposal.jobs().clamp(1, Proposal::MAX_GRADUATION);
        info!(id, name = proposal.name(), students, graduation, "Accepting proposal");

        session.add_proposal(proposal)?;
        session.set_students(id, students)?;
        session.set_graduation(id, graduation)?;
    }
    Ok(())
}

fn job_outlook(proposal: &Proposal) -> f64 {
    f64::from(proposal.jobs()) / f64::from(proposal.candidates().max(1))
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,torrington=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

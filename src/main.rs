mod input;
mod report;

use input::load_request;
use report::render_solution;
use std::error::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn Error>> {
    // Log to stderr so stdout carries only the report. RUST_LOG overrides the
    // default filter, e.g. RUST_LOG=equilibrix=trace to follow each iteration.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "equilibrix=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // The force layout comes from a JSON request when a path is given, and
    // from the built-in three-force example otherwise.
    let request = load_request(std::env::args_os().nth(1).map(Into::into))?;
    tracing::info!(
        forces = request.problem.len(),
        target_moment = request.problem.target_moment,
        "solving equilibrium problem"
    );

    // Infeasibility comes back as a status, so only invalid input or a failed
    // decomposition ends the program with an error.
    let solution = request.solve()?;

    // Render the magnitudes together with the sums of forces and moments so
    // the reader can confirm equilibrium by hand.
    print!("{}", render_solution(&request, &solution));
    Ok(())
}

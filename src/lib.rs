pub mod capacity;
pub mod herd;
pub mod proposal;
pub mod report;
pub mod scenario;
pub mod simulator;
pub mod store;
pub mod summary;
pub mod web;

pub use capacity::Capacity;
pub use proposal::{InputError, Proposal, ProposalInput};
pub use simulator::{Simulator, YearDetail, YearRecord};
pub use summary::{BreakEven, ProjectionSummary};

/// Projects ten years of herd growth and cash flow for `input`.
///
/// Total over finite input; call [`try_project`] when the input has not been
/// checked.
pub fn project(input: &ProposalInput) -> ProjectionSummary {
    let capacity = Capacity::from_input(input);
    let records = Simulator::new(input, capacity).run();
    let summary = ProjectionSummary::from_records(capacity, records);
    tracing::debug!(
        break_even = %summary.break_even,
        total_income = summary.total_income,
        total_expenses = summary.total_expenses,
        "projection complete"
    );
    summary
}

pub fn try_project(input: &ProposalInput) -> Result<ProjectionSummary, InputError> {
    input.validate()?;
    Ok(project(input))
}

// Candidate record store over the single `interview` table.

pub mod store;

pub use store::InterviewStore;

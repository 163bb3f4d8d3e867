//! Domain entities

mod job;

pub use job::Job;

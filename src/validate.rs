//! Checks a shell runs before calling into the committee.
//!
//! The committee itself trusts its caller: it accepts any non-empty
//! candidate name and any custom ministry. These checks are the rules
//! the committee's front end enforces before an operation is invoked.

use crate::model::Candidate;

pub const MIN_NAME_CHARS: usize = 3;
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_CUSTOM_SEATS: u32 = 10;

/// Why an input was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("a name is required")]
    EmptyName,

    #[error("name must be at least {min} characters", min = MIN_NAME_CHARS)]
    NameTooShort,

    #[error("name must be at most {max} characters", max = MAX_NAME_CHARS)]
    NameTooLong,

    #[error("{0} has already been nominated")]
    DuplicateCandidate(String),

    #[error("a description is required")]
    EmptyDescription,

    #[error("seat count must be between 1 and {max}", max = MAX_CUSTOM_SEATS)]
    SeatCountOutOfRange,

    #[error("the church name is required")]
    MissingChurchName,

    #[error("select at least one ministry")]
    NoMinistrySelected,

    #[error("nominate at least one candidate before voting")]
    NoCandidates,

    #[error("cast at least one vote before finalizing")]
    NoVotes,
}

/// Checks a person's name: 3 to 100 characters once trimmed.
///
/// Returns the trimmed name.
pub fn person_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    let chars = trimmed.chars().count();
    if chars == 0 {
        Err(ValidationError::EmptyName)
    } else if chars < MIN_NAME_CHARS {
        Err(ValidationError::NameTooShort)
    } else if chars > MAX_NAME_CHARS {
        Err(ValidationError::NameTooLong)
    } else {
        Ok(trimmed)
    }
}

/// Checks a candidate name against the person-name rule and against the
/// names already in the round, ignoring case.
pub fn candidate_name<'a>(
    name: &'a str,
    round: &[Candidate],
) -> Result<&'a str, ValidationError> {
    let trimmed = person_name(name)?;
    let lowered = trimmed.to_lowercase();
    if round.iter().any(|c| c.name.to_lowercase() == lowered) {
        return Err(ValidationError::DuplicateCandidate(trimmed.to_string()));
    }
    Ok(trimmed)
}

/// Checks the fields of a custom ministry before it is created.
pub fn custom_ministry(name: &str, description: &str, seats: u32) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if !(1..=MAX_CUSTOM_SEATS).contains(&seats) {
        return Err(ValidationError::SeatCountOutOfRange);
    }
    Ok(())
}

/// The committee may start once it knows its church and has something to vote.
pub fn ready_to_start(church_name: &str, selected: &[String]) -> Result<(), ValidationError> {
    if church_name.trim().is_empty() {
        return Err(ValidationError::MissingChurchName);
    }
    if selected.is_empty() {
        return Err(ValidationError::NoMinistrySelected);
    }
    Ok(())
}

/// Voting needs at least one candidate.
pub fn ready_to_vote(round: &[Candidate]) -> Result<(), ValidationError> {
    if round.is_empty() {
        return Err(ValidationError::NoCandidates);
    }
    Ok(())
}

/// Finalizing needs at least one vote.
pub fn ready_to_finalize(round: &[Candidate]) -> Result<(), ValidationError> {
    if round.iter().all(|c| c.votes == 0) {
        return Err(ValidationError::NoVotes);
    }
    Ok(())
}

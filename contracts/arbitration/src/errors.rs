use soroban_sdk::{contracterror, symbol_short, Symbol};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // --- Lifecycle (1–4) ---
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidConfig = 3,
    ContractPaused = 4,

    // --- Authorization (5–9) ---
    NotAuthorized = 5,
    NotQualified = 6,
    NotEscrowParty = 7,
    NotAssignedArbitrator = 8,

    // --- Not found (10–13) ---
    DisputeNotFound = 10,
    EscrowNotFound = 11,
    ArbitratorNotFound = 12,
    NoPendingSelection = 13,

    // --- State conflicts (14–20) ---
    DisputeAlreadyExists = 14,
    DisputeAlreadyResolved = 15,
    DisputeNotResolved = 16,
    AlreadyVoted = 17,
    AppealAlreadyFiled = 18,
    EvidencePeriodClosed = 19,

    // --- Insufficient resources (21–22) ---
    InsufficientStake = 21,
    InsufficientArbitrators = 22,

    // --- Timing (23–24) ---
    SelectionNotReady = 23,
    DeadlineNotReached = 24,

    // --- Input validation / capacity (25–29) ---
    InvalidVoteType = 25,
    InvalidAmount = 26,
    InvalidInput = 27,
    EvidenceLimitReached = 28,
    PoolFull = 29,

    // --- Selection commit/reveal (30–35) ---
    CommitmentClosed = 30,
    AlreadyCommitted = 31,
    MissingCommitment = 32,
    InvalidReveal = 33,
    AlreadyRevealed = 34,
    AwaitingReveal = 35,
}

/// Recovery hints surfaced to callers alongside an error.
pub fn get_suggestion(error: Error) -> Symbol {
    match error {
        Error::SelectionNotReady | Error::DeadlineNotReached | Error::AwaitingReveal => {
            symbol_short!("RE_TRY_L")
        }
        Error::NotAuthorized
        | Error::NotQualified
        | Error::NotEscrowParty
        | Error::NotAssignedArbitrator => symbol_short!("CHK_AUTH"),
        Error::DisputeNotFound | Error::EscrowNotFound | Error::ArbitratorNotFound => {
            symbol_short!("CHK_ID")
        }
        Error::InsufficientStake => symbol_short!("ADD_STAK"),
        Error::InsufficientArbitrators | Error::PoolFull => symbol_short!("WAIT_POL"),
        Error::InvalidVoteType
        | Error::InvalidAmount
        | Error::InvalidInput
        | Error::MissingCommitment
        | Error::InvalidReveal => symbol_short!("FIX_ARG"),
        Error::ContractPaused => symbol_short!("PAUSED"),
        _ => symbol_short!("CONTACT"),
    }
}

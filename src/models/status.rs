use serde::{Deserialize, Serialize};

/// Candidate funnel states. Stored as text; transitions are direct writes
/// (accept/decline/hire handlers overwrite the current value, no transition
/// table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    Registered,
    ProfileCompleted,
    InCourse,
    TestCompleted,
    OfferSent,
    OfferAccepted,
    OfferDeclined,
    Hired,
    Rejected,
    InTalentPool,
}

impl CandidateStatus {
    /// Funnel order, used by the dashboard counts.
    pub const ALL: [CandidateStatus; 10] = [
        CandidateStatus::Registered,
        CandidateStatus::ProfileCompleted,
        CandidateStatus::InCourse,
        CandidateStatus::TestCompleted,
        CandidateStatus::OfferSent,
        CandidateStatus::OfferAccepted,
        CandidateStatus::OfferDeclined,
        CandidateStatus::Hired,
        CandidateStatus::Rejected,
        CandidateStatus::InTalentPool,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Registered => "REGISTERED",
            CandidateStatus::ProfileCompleted => "PROFILE_COMPLETED",
            CandidateStatus::InCourse => "IN_COURSE",
            CandidateStatus::TestCompleted => "TEST_COMPLETED",
            CandidateStatus::OfferSent => "OFFER_SENT",
            CandidateStatus::OfferAccepted => "OFFER_ACCEPTED",
            CandidateStatus::OfferDeclined => "OFFER_DECLINED",
            CandidateStatus::Hired => "HIRED",
            CandidateStatus::Rejected => "REJECTED",
            CandidateStatus::InTalentPool => "IN_TALENT_POOL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

/// Domain events an automation trigger can be attached to. The evaluation
/// engine lives outside this service; these are validated at CRUD time only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerEvent {
    CandidateRegistered,
    CourseCompleted,
    TestPassed,
    TestFailed,
    OfferSent,
    OfferAccepted,
    OfferDeclined,
    StatusChanged,
}

impl TriggerEvent {
    pub const ALL: [TriggerEvent; 8] = [
        TriggerEvent::CandidateRegistered,
        TriggerEvent::CourseCompleted,
        TriggerEvent::TestPassed,
        TriggerEvent::TestFailed,
        TriggerEvent::OfferSent,
        TriggerEvent::OfferAccepted,
        TriggerEvent::OfferDeclined,
        TriggerEvent::StatusChanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerEvent::CandidateRegistered => "CANDIDATE_REGISTERED",
            TriggerEvent::CourseCompleted => "COURSE_COMPLETED",
            TriggerEvent::TestPassed => "TEST_PASSED",
            TriggerEvent::TestFailed => "TEST_FAILED",
            TriggerEvent::OfferSent => "OFFER_SENT",
            TriggerEvent::OfferAccepted => "OFFER_ACCEPTED",
            TriggerEvent::OfferDeclined => "OFFER_DECLINED",
            TriggerEvent::StatusChanged => "STATUS_CHANGED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

/// Delivery targets. Only INTERNAL is displayed in scope; EMAIL/PUSH rows
/// are persisted as addressing metadata for out-of-scope transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Internal,
    Email,
    Push,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Internal, Channel::Email, Channel::Push];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Internal => "INTERNAL",
            Channel::Email => "EMAIL",
            Channel::Push => "PUSH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

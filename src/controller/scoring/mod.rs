pub mod http_handlers;
pub mod scorecard_service;
pub mod verification;

pub use scorecard_service::{
    PlayerScoreView, ScorecardView, complete_round, get_scorecard, open_scorecard,
    record_hole_score, record_scores,
};
pub use verification::{request_verification, verify_scores};

use serde::Serialize;

use crate::models::media::{CitationSource, MediaDescriptor};

pub const VALIDATION_FAILED_MSG: &str =
    "Link validation failed. Please use a supported platform URL.";
pub const EXTRACTION_FAILED_MSG: &str =
    "Extraction failed. The link might be restricted or offline.";

/// Top-level request state. Exactly one instance, owned by the controller,
/// fully replaced on every transition.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestState {
    pub in_flight: bool,
    pub error: Option<String>,
    pub result: Option<MediaDescriptor>,
    pub sources: Vec<CitationSource>,
}

#[derive(Debug)]
pub enum StateEvent {
    SubmitStarted,
    ValidationFailed,
    Resolved {
        descriptor: MediaDescriptor,
        sources: Vec<CitationSource>,
    },
    AcquisitionFailed,
}

/// Pure transition: every event yields a complete replacement state, never a
/// merge with the previous one.
pub fn reduce(event: StateEvent) -> RequestState {
    match event {
        StateEvent::SubmitStarted => RequestState {
            in_flight: true,
            error: None,
            result: None,
            sources: Vec::new(),
        },
        StateEvent::ValidationFailed => RequestState {
            in_flight: false,
            error: Some(VALIDATION_FAILED_MSG.to_string()),
            result: None,
            sources: Vec::new(),
        },
        StateEvent::Resolved {
            descriptor,
            sources,
        } => RequestState {
            in_flight: false,
            error: None,
            result: Some(descriptor),
            sources,
        },
        StateEvent::AcquisitionFailed => RequestState {
            in_flight: false,
            error: Some(EXTRACTION_FAILED_MSG.to_string()),
            result: None,
            sources: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> MediaDescriptor {
        MediaDescriptor {
            title: "t".into(),
            thumbnail: "http://img".into(),
            duration: "1:00".into(),
            platform: "YouTube".into(),
            formats: vec![],
        }
    }

    #[test]
    fn submit_clears_previous_result() {
        let state = reduce(StateEvent::SubmitStarted);
        assert!(state.in_flight);
        assert!(state.error.is_none());
        assert!(state.result.is_none());
        assert!(state.sources.is_empty());
    }

    #[test]
    fn validation_failure_sets_banner_only() {
        let state = reduce(StateEvent::ValidationFailed);
        assert!(!state.in_flight);
        assert_eq!(state.error.as_deref(), Some(VALIDATION_FAILED_MSG));
        assert!(state.result.is_none());
    }

    #[test]
    fn resolved_replaces_everything() {
        let state = reduce(StateEvent::Resolved {
            descriptor: descriptor(),
            sources: vec![],
        });
        assert!(!state.in_flight);
        assert!(state.error.is_none());
        assert_eq!(state.result.unwrap().title, "t");
    }

    #[test]
    fn acquisition_failure_collapses_to_one_message() {
        let state = reduce(StateEvent::AcquisitionFailed);
        assert_eq!(state.error.as_deref(), Some(EXTRACTION_FAILED_MSG));
        assert!(state.result.is_none());
    }
}

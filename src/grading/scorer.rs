// External classifier contract
//
// The classifier compares a live frame against the reference sign for a
// label and answers with `{ ok, similarity }`. `ok == false` means no hand
// was found in the frame.

use futures::future::{self, BoxFuture};
use serde::{Deserialize, Serialize};

/// Response from one scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalResponse {
    pub ok: bool,
    #[serde(default)]
    pub similarity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl EvalResponse {
    pub fn hit(similarity: f32) -> Self {
        Self {
            ok: true,
            similarity,
            reason: None,
        }
    }

    pub fn no_hand() -> Self {
        Self {
            ok: false,
            similarity: 0.0,
            reason: Some("NO_HAND".to_string()),
        }
    }

    /// Input for [`SignGrader::submit`](crate::grading::SignGrader::submit)
    pub fn sample(&self) -> Option<f32> {
        self.ok.then_some(self.similarity)
    }
}

/// Source of similarity scores for a target label
///
/// Implementations capture a frame and call out to the classifier; any
/// timeout handling belongs here, not in the grader. Scoring is awaited on
/// the runner's task, so a client built on blocking IO has to move that
/// work onto `tokio::task::spawn_blocking` inside the returned future.
pub trait SimilarityScorer: Send {
    fn score<'a>(&'a mut self, label: &'a str) -> BoxFuture<'a, anyhow::Result<EvalResponse>>;
}

/// Scorer replaying a fixed list of responses, then reporting no hand
pub struct ScriptedScorer {
    responses: std::vec::IntoIter<EvalResponse>,
}

impl ScriptedScorer {
    pub fn new(responses: Vec<EvalResponse>) -> Self {
        Self {
            responses: responses.into_iter(),
        }
    }

    /// Build from optional similarities, `None` meaning no hand
    pub fn from_samples(samples: &[Option<f32>]) -> Self {
        Self::new(
            samples
                .iter()
                .map(|s| match s {
                    Some(v) => EvalResponse::hit(*v),
                    None => EvalResponse::no_hand(),
                })
                .collect(),
        )
    }
}

impl SimilarityScorer for ScriptedScorer {
    fn score<'a>(&'a mut self, _label: &'a str) -> BoxFuture<'a, anyhow::Result<EvalResponse>> {
        let response = self.responses.next().unwrap_or_else(EvalResponse::no_hand);
        Box::pin(future::ready(Ok(response)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_mapping() {
        assert_eq!(EvalResponse::hit(0.91).sample(), Some(0.91));
        assert_eq!(EvalResponse::no_hand().sample(), None);
    }

    #[test]
    fn test_parse_classifier_payloads() {
        let ok: EvalResponse = serde_json::from_str(r#"{"ok": true, "similarity": 0.87}"#).unwrap();
        assert_eq!(ok.sample(), Some(0.87));

        let miss: EvalResponse =
            serde_json::from_str(r#"{"ok": false, "reason": "NO_HAND", "similarity": 0.0}"#)
                .unwrap();
        assert_eq!(miss.sample(), None);
        assert_eq!(miss.reason.as_deref(), Some("NO_HAND"));
    }

    #[tokio::test]
    async fn test_scripted_scorer_runs_out_to_no_hand() {
        let mut scorer = ScriptedScorer::from_samples(&[Some(0.5), None]);
        assert_eq!(scorer.score("A").await.unwrap().sample(), Some(0.5));
        assert_eq!(scorer.score("A").await.unwrap().sample(), None);
        assert!(!scorer.score("A").await.unwrap().ok);
    }

    struct BlockingClient;

    impl SimilarityScorer for BlockingClient {
        fn score<'a>(
            &'a mut self,
            _label: &'a str,
        ) -> BoxFuture<'a, anyhow::Result<EvalResponse>> {
            Box::pin(async {
                let response = tokio::task::spawn_blocking(|| {
                    std::thread::sleep(std::time::Duration::from_millis(5));
                    EvalResponse::hit(0.9)
                })
                .await?;
                Ok(response)
            })
        }
    }

    #[tokio::test]
    async fn test_blocking_client_runs_off_the_runtime_thread() {
        let mut scorer = BlockingClient;
        let response = scorer.score("A").await.unwrap();
        assert_eq!(response.sample(), Some(0.9));
    }
}

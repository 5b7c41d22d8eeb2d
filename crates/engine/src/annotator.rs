//! Per-chunk annotation with fallback to the original text.

use docweave_splice::{extract_source_block, Chunk, Language};

use crate::client::TextGenerator;
use crate::config::GenerationOptions;
use crate::prompt;

/// Result of annotating one chunk.
///
/// Annotation never fails a unit: any error on a chunk keeps the original
/// chunk text so reassembly stays lossless.
#[derive(Debug, Clone)]
pub enum AnnotationOutcome {
    /// The service returned usable annotated code
    Generated {
        /// Annotated code extracted from the response
        text: String,
        /// Full model response before extraction
        raw: String,
    },
    /// The original chunk text was kept
    Fallback { reason: String },
}

impl AnnotationOutcome {
    /// Check whether this outcome kept the original text
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, AnnotationOutcome::Fallback { .. })
    }
}

/// Sends one chunk at a time to a generator and guards the result
pub struct ChunkAnnotator<'a> {
    generator: &'a dyn TextGenerator,
    options: &'a GenerationOptions,
}

impl<'a> ChunkAnnotator<'a> {
    pub fn new(generator: &'a dyn TextGenerator, options: &'a GenerationOptions) -> Self {
        Self { generator, options }
    }

    /// Annotate a single chunk of a source unit.
    ///
    /// A transport failure or a response with no extractable code degrades
    /// to a fallback outcome; the caller substitutes the original chunk.
    pub async fn annotate(
        &self,
        unit_name: &str,
        language: Language,
        chunk: &Chunk,
    ) -> AnnotationOutcome {
        let request = prompt::annotation_request(unit_name, language, &chunk.text, self.options);
        match self.generator.generate(&request).await {
            Ok(raw) => {
                let text = extract_source_block(&raw);
                if text.is_empty() {
                    let reason = "no code found in the model response".to_string();
                    log::warn!(
                        "lines {}-{} of {}: {}; keeping original text",
                        chunk.start_line,
                        chunk.end_line,
                        unit_name,
                        reason
                    );
                    AnnotationOutcome::Fallback { reason }
                } else {
                    AnnotationOutcome::Generated { text, raw }
                }
            }
            Err(err) => {
                let reason = err.to_string();
                log::warn!(
                    "lines {}-{} of {}: {}; keeping original text",
                    chunk.start_line,
                    chunk.end_line,
                    unit_name,
                    reason
                );
                AnnotationOutcome::Fallback { reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GenerateRequest;
    use crate::error::{EngineError, Result};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct FixedGenerator(String);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _request: &GenerateRequest) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _request: &GenerateRequest) -> Result<String> {
            Err(EngineError::RateLimited)
        }
    }

    fn sample_chunk() -> Chunk {
        Chunk::new(1, 3, "def a\n  1\nend".to_string())
    }

    #[tokio::test]
    async fn test_generated_outcome_extracts_code() {
        let generator = FixedGenerator(
            "Here is the documented code:\n\n```ruby\n# Adds one.\ndef a\n  1\nend\n```".to_string(),
        );
        let options = GenerationOptions::default();
        let annotator = ChunkAnnotator::new(&generator, &options);
        let outcome = annotator
            .annotate("util.rb", Language::Ruby, &sample_chunk())
            .await;
        match outcome {
            AnnotationOutcome::Generated { text, raw } => {
                assert_eq!(text, "# Adds one.\ndef a\n  1\nend");
                assert!(raw.starts_with("Here is"));
            }
            AnnotationOutcome::Fallback { reason } => panic!("unexpected fallback: {reason}"),
        }
    }

    #[tokio::test]
    async fn test_response_without_code_falls_back() {
        let generator = FixedGenerator("I cannot annotate this chunk.".to_string());
        let options = GenerationOptions::default();
        let annotator = ChunkAnnotator::new(&generator, &options);
        let outcome = annotator
            .annotate("util.rb", Language::Ruby, &sample_chunk())
            .await;
        assert!(outcome.is_fallback());
    }

    #[tokio::test]
    async fn test_generator_error_falls_back() {
        let options = GenerationOptions::default();
        let annotator = ChunkAnnotator::new(&FailingGenerator, &options);
        let outcome = annotator
            .annotate("util.rb", Language::Ruby, &sample_chunk())
            .await;
        match outcome {
            AnnotationOutcome::Fallback { reason } => {
                assert!(reason.contains("Rate limited"));
            }
            AnnotationOutcome::Generated { .. } => panic!("expected fallback"),
        }
    }

    #[tokio::test]
    async fn test_stub_generator_round_trips_chunk() {
        let options = GenerationOptions::default();
        let generator = crate::client::StubGenerator;
        let annotator = ChunkAnnotator::new(&generator, &options);
        let outcome = annotator
            .annotate("util.rb", Language::Ruby, &sample_chunk())
            .await;
        match outcome {
            AnnotationOutcome::Generated { text, .. } => assert_eq!(text, "def a\n  1\nend"),
            AnnotationOutcome::Fallback { reason } => panic!("unexpected fallback: {reason}"),
        }
    }
}

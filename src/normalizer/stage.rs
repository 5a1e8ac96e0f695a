/// One step of the standardization pipeline, applied to a single sentence.
pub trait SentenceStage: Send + Sync {
    /// Transform one sentence. Stages never see neighbouring utterances.
    fn apply(&self, sentence: &str) -> String;

    /// Get the name of this stage for logging
    fn name(&self) -> &'static str;
}

/// Index of a pipeline registered with a [`Scene`](super::Scene).
///
/// Ids are handed out in registration order and stay valid for the life of
/// the scene.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PipelineId(pub(crate) u32);

impl PipelineId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

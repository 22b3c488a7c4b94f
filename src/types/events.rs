/// Ordered change notifications emitted by the model.
///
/// The presentation layer drains these after each event-processing tick and
/// re-renders from model state; it never reads state back out of rendered
/// output.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    TabCreated(String),
    TabClosed(String),
    /// Title, favicon, url, or loading state of a tab changed.
    TabUpdated(String),
    ActiveChanged(Option<String>),
    /// The top-level ordering, pin partition, or folder membership changed.
    LayoutChanged,
    FolderChanged(String),
    SplitChanged,
    /// A load gave no completion signal within the stall interval and was
    /// cancelled. The tab's last-known-good url and history are untouched.
    LoadStalled { tab_id: String, url: String },
    /// A load failed after exhausting its retry budget.
    LoadFailed { tab_id: String, code: i64 },
}

//! The error chain and the operations that build it.
//!
//! A [`Chain`] is an ordered, never empty sequence of [`Node`]s. Index `0`
//! holds the outermost node, the one added most recently, and the last index
//! holds the root cause. Every operation that extends a chain consumes it and
//! returns the extended chain; nodes are reference counted, so cloning a
//! chain never lets two owners observe each other's changes.
//!
//! ```
//! use errtrail::{Chain, Code};
//!
//! let chain = Chain::new("connection reset")
//!     .wrap(Code::new(100), "could not fetch profile")
//!     .wrap(Code::UNSPECIFIED, "request failed");
//!
//! assert_eq!(chain.len(), 3);
//! assert_eq!(chain.message(), "request failed");
//! assert_eq!(chain.cause().message(), "connection reset");
//! ```

mod iter;
mod lock;
pub mod shared;

use alloc::{borrow::Cow, vec, vec::Vec};

use triomphe::Arc;

pub use self::iter::Nodes;
use crate::{Code, Frame, IntoChain, Node, Registry};

/// An error annotated with the call sites it passed through.
///
/// See the [module level documentation](self) for an overview.
#[derive(Clone)]
pub struct Chain {
    nodes: Vec<Arc<Node>>,
}

impl Chain {
    /// Creates a chain with a single node carrying `message` and the code
    /// [`Code::UNKNOWN`].
    #[track_caller]
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::coded(Code::UNKNOWN, message)
    }

    /// Creates a chain with a single node carrying `message` and `code`.
    #[track_caller]
    #[must_use]
    pub fn coded(code: Code, message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_node(Node::from_message(message.into(), code, Frame::capture()))
    }

    /// Converts `error` into a chain.
    ///
    /// An existing chain is returned as is, except that its outermost code is
    /// replaced when `code` is given. Any other error becomes a chain with a
    /// single node located at the caller.
    ///
    /// ```
    /// use errtrail::{Chain, Code};
    ///
    /// let io = std::io::Error::other("broken pipe");
    /// let chain = Chain::from_error(io, Some(Code::new(100)));
    /// assert_eq!(chain.len(), 1);
    /// assert_eq!(chain.code(), Code::new(100));
    ///
    /// let recoded = Chain::from_error(chain, Some(Code::FATAL));
    /// assert_eq!(recoded.len(), 1);
    /// assert_eq!(recoded.message(), "broken pipe");
    /// ```
    #[track_caller]
    #[must_use]
    pub fn from_error(error: impl IntoChain, code: Option<Code>) -> Self {
        let chain = error.into_chain();
        match code {
            Some(code) => chain.with_code(code),
            None => chain,
        }
    }

    /// Wraps `error` with a new outermost node, or creates a fresh chain when
    /// there is no error.
    #[track_caller]
    #[must_use]
    pub fn wrap_or_new<E: IntoChain>(
        error: Option<E>,
        code: Code,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        match error {
            Some(error) => error.into_chain().wrap(code, message),
            None => Self::coded(code, message),
        }
    }

    pub(crate) fn from_node(node: Node) -> Self {
        Self {
            nodes: vec![Arc::new(node)],
        }
    }

    /// Adds a new outermost node carrying `message` and `code`.
    #[track_caller]
    #[must_use]
    pub fn wrap(self, code: Code, message: impl Into<Cow<'static, str>>) -> Self {
        self.wrap_node(Node::from_message(message.into(), code, Frame::capture()))
    }

    /// `nodes` must not be empty.
    pub(crate) fn from_nodes(nodes: Vec<Arc<Node>>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes }
    }

    pub(crate) fn into_nodes(self) -> Vec<Arc<Node>> {
        self.nodes
    }

    pub(crate) fn wrap_node(mut self, node: Node) -> Self {
        self.nodes.insert(0, Arc::new(node));
        self
    }

    /// Inserts `error` directly behind the outermost node.
    ///
    /// All nodes of `error` are kept, in order. The outermost node of `self`
    /// stays outermost.
    ///
    /// ```
    /// use errtrail::Chain;
    ///
    /// let chain = Chain::new("save failed").with(Chain::new("disk full"));
    /// let messages: Vec<_> = chain.nodes().map(|node| node.message()).collect();
    /// assert_eq!(messages, ["save failed", "disk full"]);
    /// ```
    #[track_caller]
    #[must_use]
    pub fn with(self, error: impl IntoChain) -> Self {
        let other = error.into_chain();
        self.splice_behind(other.into_nodes())
    }

    /// Like [`with`](Self::with), but does nothing for `None`.
    #[track_caller]
    #[must_use]
    pub fn with_opt<E: IntoChain>(self, error: Option<E>) -> Self {
        match error {
            Some(error) => self.with(error),
            None => self,
        }
    }

    /// Inserts a new node carrying `message` directly behind the outermost
    /// node.
    #[track_caller]
    #[must_use]
    pub fn add(self, message: impl Into<Cow<'static, str>>) -> Self {
        let node = Node::from_message(message.into(), Code::UNKNOWN, Frame::capture());
        self.splice_behind(vec![Arc::new(node)])
    }

    pub(crate) fn splice_behind(mut self, nodes: Vec<Arc<Node>>) -> Self {
        self.nodes.splice(1..1, nodes);
        self
    }

    /// Records that the outermost error passed through the caller.
    ///
    /// The new outermost node is the previous outermost error seen from the
    /// caller's location. The previous outermost node is kept as a
    /// [tracked](Node::is_tracked) node without text, so the message appears
    /// once in traces.
    ///
    /// ```
    /// use errtrail::Chain;
    ///
    /// let chain = Chain::new("timeout").track();
    /// assert_eq!(chain.len(), 2);
    /// assert_eq!(chain.message(), "timeout");
    /// assert!(chain.is(&chain.unwrap().unwrap()));
    /// ```
    #[track_caller]
    #[must_use]
    pub fn track(self) -> Self {
        self.track_at(Frame::capture())
    }

    pub(crate) fn track_at(mut self, frame: Frame) -> Self {
        let node = self.outermost().relocated(frame);
        self.nodes[0] = Arc::new(self.outermost().tracked());
        self.wrap_node(node)
    }

    /// Replaces the code of the outermost node, keeping its error and
    /// location.
    #[must_use]
    pub fn with_code(mut self, code: Code) -> Self {
        let node = self.outermost().recoded(code);
        self.nodes[0] = Arc::new(node);
        self
    }

    /// The outermost node.
    #[must_use]
    pub fn outermost(&self) -> &Node {
        &self.nodes[0]
    }

    /// The root cause.
    #[must_use]
    pub fn cause(&self) -> &Node {
        &self.nodes[self.nodes.len() - 1]
    }

    /// The node at `index`, counting from the outermost node.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index).map(|node| &**node)
    }

    /// The number of nodes. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over the nodes, outermost first.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::new(&self.nodes)
    }

    /// The code of the outermost node.
    #[must_use]
    pub fn code(&self) -> Code {
        self.outermost().code()
    }

    /// The literal message of the outermost node.
    #[must_use]
    pub fn message(&self) -> Cow<'_, str> {
        self.outermost().message()
    }

    /// The location of the outermost node.
    #[must_use]
    pub fn caller(&self) -> &Frame {
        self.outermost().frame()
    }

    /// The location of every node, outermost first.
    pub fn frames(&self) -> impl DoubleEndedIterator<Item = &Frame> + ExactSizeIterator + '_ {
        self.nodes().map(Node::frame)
    }

    /// The text of the outermost node that is safe to show to external
    /// consumers, according to the global [`Registry`].
    ///
    /// This is what the [`Display`](core::fmt::Display) implementation prints
    /// without flags.
    #[must_use]
    pub fn external_text(&self) -> Cow<'_, str> {
        self.external_text_in(Registry::global())
    }

    /// Like [`external_text`](Self::external_text), with an explicit registry.
    #[must_use]
    pub fn external_text_in<'a>(&'a self, registry: &'a Registry) -> Cow<'a, str> {
        self.outermost().external_text_in(registry)
    }

    /// The internal text of the outermost node, according to `registry`.
    #[must_use]
    pub fn internal_text_in<'a>(&'a self, registry: &'a Registry) -> Cow<'a, str> {
        self.outermost().internal_text_in(registry)
    }

    /// The HTTP status hint for the outermost code, according to the global
    /// [`Registry`].
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.http_status_in(Registry::global())
    }

    /// Like [`http_status`](Self::http_status), with an explicit registry.
    #[must_use]
    pub fn http_status_in(&self, registry: &Registry) -> u16 {
        registry.metadata(self.code()).http_status()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::ToString, vec::Vec};

    use super::*;
    use crate::{Format, Metadata};

    fn messages(chain: &Chain) -> Vec<alloc::string::String> {
        chain.nodes().map(|node| node.message().into_owned()).collect()
    }

    #[test]
    fn test_new_defaults_to_unknown() {
        let (chain, line) = (Chain::new("boom"), line!());
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.code(), Code::UNKNOWN);
        assert_eq!(chain.caller().line(), line);
        assert!(chain.outermost().same_error(chain.cause()));
    }

    #[test]
    fn test_wrap_adds_one_outermost_node() {
        let base = Chain::new("a");
        let (wrapped, line) = (base.clone().wrap(Code::new(201), "b"), line!());
        assert_eq!(wrapped.len(), base.len() + 1);
        assert_eq!(wrapped.code(), Code::new(201));
        assert_eq!(wrapped.caller().line(), line);
        assert_eq!(messages(&wrapped), ["b", "a"]);
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn test_wrap_or_new() {
        let registry = Registry::new();
        let (fresh, new) = (
            Chain::wrap_or_new(None::<Chain>, Code::FATAL, "x"),
            Chain::coded(Code::FATAL, "x"),
        );
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh.code(), Code::FATAL);
        assert_eq!(fresh.to_string(), new.to_string());
        let formats = [
            Format::PLAIN,
            Format::DETAILED.with_caller().with_full_trace(),
            Format::DETAILED.json(),
        ];
        for format in formats {
            assert_eq!(format.render_in(&fresh, &registry), format.render_in(&new, &registry));
        }

        let wrapped = Chain::wrap_or_new(Some(Chain::new("a")), Code::FATAL, "x");
        assert_eq!(messages(&wrapped), ["x", "a"]);
    }

    #[test]
    fn test_with_inserts_behind_outermost() {
        let inner = Chain::new("y").wrap(Code::UNKNOWN, "x");
        let chain = Chain::new("b").wrap(Code::UNKNOWN, "a").with(inner);
        assert_eq!(messages(&chain), ["a", "x", "y", "b"]);

        let unchanged = Chain::new("a").with_opt(None::<Chain>);
        assert_eq!(unchanged.len(), 1);
    }

    #[test]
    fn test_add_inserts_behind_outermost() {
        let chain = Chain::new("root").wrap(Code::UNKNOWN, "top").add("note");
        assert_eq!(messages(&chain), ["top", "note", "root"]);
    }

    #[test]
    fn test_track_keeps_message_once() {
        let (original, first) = (Chain::coded(Code::new(5), "timeout"), line!());
        let (tracked, second) = (original.clone().track(), line!());

        assert_eq!(tracked.len(), 2);
        assert_eq!(tracked.code(), Code::new(5));
        assert_eq!(tracked.caller().line(), second);
        assert_eq!(tracked.cause().frame().line(), first);
        assert!(tracked.outermost().same_error(original.outermost()));
        assert!(!tracked.outermost().is_tracked());
        assert!(tracked.cause().is_tracked());
        assert_eq!(tracked.message(), "timeout");
        assert_eq!(tracked.cause().message(), "");
        assert!(!original.outermost().is_tracked());
    }

    #[test]
    fn test_with_same_error_keeps_text() {
        let chain = Chain::new("disk full");
        let joined = chain.clone().with(chain.clone());
        assert_eq!(joined.len(), 2);
        assert!(joined.outermost().same_error(joined.cause()));
        assert!(joined.nodes().all(|node| !node.is_tracked()));
        assert_eq!(messages(&joined), ["disk full", "disk full"]);

        let trace = Format::DETAILED.with_full_trace().render_in(&joined, &Registry::new());
        assert_eq!(
            trace,
            format!("disk full - #0 {}; disk full - #1 {};", joined.caller(), joined.cause().frame())
        );
    }

    #[test]
    fn test_with_code_keeps_payload_and_frame() {
        let chain = Chain::new("a");
        let recoded = chain.clone().with_code(Code::FATAL);
        assert_eq!(recoded.code(), Code::FATAL);
        assert_eq!(recoded.caller(), chain.caller());
        assert!(recoded.outermost().same_error(chain.outermost()));
    }

    #[test]
    fn test_http_status() {
        let registry = Registry::new()
            .register(Code::new(404), Metadata::new("Not Found", "missing").with_http_status(404));
        assert_eq!(Chain::coded(Code::new(404), "x").http_status_in(&registry), 404);
        assert_eq!(Chain::coded(Code::new(999), "x").http_status_in(&registry), 500);
    }

    #[test]
    fn test_frames_outermost_first() {
        let (chain, line) = (Chain::new("a").wrap(Code::UNKNOWN, "b"), line!());
        let lines: Vec<u32> = chain.frames().map(Frame::line).collect();
        assert_eq!(lines, [line, line]);
        assert_eq!(chain.frames().len(), 2);
    }
}

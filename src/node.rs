use alloc::{
    borrow::Cow,
    boxed::Box,
    string::{String, ToString},
};
use core::{error::Error, fmt};

use triomphe::Arc;

use crate::{Code, Frame, Registry};

/// The error a [`Node`] stands for.
///
/// Payloads are reference counted and never mutated. Two nodes sharing the
/// same payload represent the same error, which is what [`Chain::is`] and
/// [`Chain::has`] test for.
///
/// [`Chain::is`]: crate::Chain::is
/// [`Chain::has`]: crate::Chain::has
enum Payload {
    Message(Cow<'static, str>),
    Error(Box<dyn Error + Send + Sync + 'static>),
}

/// One causal step of a [`Chain`](crate::Chain).
///
/// A node is created exactly once, when a call site introduces, wraps, or
/// annotates an error, and is immutable afterwards.
///
/// [`Chain::track`](crate::Chain::track) leaves behind a *tracked* node: it
/// still stands for its error, but has no text of its own, so a tracked
/// message is rendered once.
#[derive(Clone)]
pub struct Node {
    payload: Arc<Payload>,
    code: Code,
    frame: Frame,
    tracked: bool,
}

impl Node {
    pub(crate) fn from_message(message: Cow<'static, str>, code: Code, frame: Frame) -> Self {
        Self {
            payload: Arc::new(Payload::Message(message)),
            code,
            frame,
            tracked: false,
        }
    }

    pub(crate) fn from_error(
        error: Box<dyn Error + Send + Sync + 'static>,
        code: Code,
        frame: Frame,
    ) -> Self {
        Self {
            payload: Arc::new(Payload::Error(error)),
            code,
            frame,
            tracked: false,
        }
    }

    /// The same error with a different code.
    pub(crate) fn recoded(&self, code: Code) -> Self {
        Self {
            code,
            ..self.clone()
        }
    }

    /// The same error seen from a different call site.
    pub(crate) fn relocated(&self, frame: Frame) -> Self {
        Self {
            frame,
            tracked: false,
            ..self.clone()
        }
    }

    /// The same error and location, without text of its own.
    pub(crate) fn tracked(&self) -> Self {
        Self {
            tracked: true,
            ..self.clone()
        }
    }

    /// The literal message of this node.
    ///
    /// For a node absorbing a foreign error this is the error's `Display`
    /// output. Tracked nodes have an empty message.
    #[must_use]
    pub fn message(&self) -> Cow<'_, str> {
        if self.tracked {
            return Cow::Borrowed("");
        }
        match &*self.payload {
            Payload::Message(message) => Cow::Borrowed(message),
            Payload::Error(error) => Cow::Owned(error.to_string()),
        }
    }

    /// Returns `true` if the node has no text to display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &*self.payload {
            _ if self.tracked => true,
            Payload::Message(message) => message.is_empty(),
            Payload::Error(_) => self.message().is_empty(),
        }
    }

    /// Returns `true` for a node left behind by
    /// [`Chain::track`](crate::Chain::track).
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    /// The code of this node.
    #[must_use]
    pub fn code(&self) -> Code {
        self.code
    }

    /// The call site at which this node was created.
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The foreign error absorbed by this node, if any.
    #[must_use]
    pub fn source_error(&self) -> Option<&(dyn Error + 'static)> {
        match &*self.payload {
            Payload::Error(error) => Some(&**error),
            Payload::Message(_) => None,
        }
    }

    /// Returns `true` if both nodes stand for the same error.
    #[must_use]
    pub fn same_error(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }

    /// The text of this node that is safe for external consumers.
    ///
    /// This is the external text registered for the node's code, or the
    /// literal message when the code is [`Code::UNSPECIFIED`] or its metadata
    /// has no external text.
    #[must_use]
    pub fn external_text_in<'a>(&'a self, registry: &'a Registry) -> Cow<'a, str> {
        if self.tracked || self.code == Code::UNSPECIFIED {
            return self.message();
        }
        match registry.metadata(self.code).external() {
            "" => self.message(),
            external => Cow::Borrowed(external),
        }
    }

    /// The internal text registered for the node's code, falling back to the
    /// literal message.
    #[must_use]
    pub fn internal_text_in<'a>(&'a self, registry: &'a Registry) -> Cow<'a, str> {
        if self.tracked || self.code == Code::UNSPECIFIED {
            return self.message();
        }
        match registry.metadata(self.code).internal() {
            "" => self.message(),
            internal => Cow::Borrowed(internal),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.payload {
            _ if self.tracked => Ok(()),
            Payload::Message(message) => f.write_str(message),
            Payload::Error(error) => fmt::Display::fmt(error, f),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Node");
        match &*self.payload {
            Payload::Message(message) => debug.field("message", message),
            Payload::Error(error) => debug.field("error", error),
        };
        debug
            .field("code", &self.code)
            .field("frame", &self.frame)
            .field("tracked", &self.tracked)
            .finish()
    }
}

impl From<&Node> for String {
    fn from(node: &Node) -> Self {
        node.message().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;
    use crate::Metadata;

    #[derive(Debug)]
    struct Disk;

    impl fmt::Display for Disk {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("disk on fire")
        }
    }

    impl Error for Disk {}

    #[test]
    fn test_message_and_foreign_error() {
        let node = Node::from_message("plain".into(), Code::UNKNOWN, Frame::UNKNOWN);
        assert_eq!(node.message(), "plain");
        assert!(node.source_error().is_none());

        let node = Node::from_error(Box::new(Disk), Code::UNKNOWN, Frame::UNKNOWN);
        assert_eq!(node.message(), "disk on fire");
        assert!(node.source_error().unwrap().is::<Disk>());
        assert_eq!(format!("{node}"), "disk on fire");
    }

    #[test]
    fn test_identity_is_shared_by_derived_nodes() {
        let node = Node::from_message("a".into(), Code::UNKNOWN, Frame::UNKNOWN);
        let other = Node::from_message("a".into(), Code::UNKNOWN, Frame::UNKNOWN);
        assert!(node.same_error(&node.recoded(Code::FATAL)));
        assert!(node.same_error(&node.relocated(Frame::capture())));
        assert!(!node.same_error(&other));
        assert!(node.same_error(&node.tracked()));
    }

    #[test]
    fn test_tracked_node_has_no_text() {
        let registry = Registry::new();
        let node = Node::from_error(Box::new(Disk), Code::FATAL, Frame::UNKNOWN).tracked();
        assert!(node.is_tracked());
        assert!(node.is_empty());
        assert_eq!(node.message(), "");
        assert_eq!(format!("{node}"), "");
        assert_eq!(node.external_text_in(&registry), "");
        assert_eq!(node.internal_text_in(&registry), "");
        assert!(node.source_error().is_some());

        let relocated = node.relocated(Frame::capture());
        assert!(!relocated.is_tracked());
        assert_eq!(relocated.message(), "disk on fire");
    }

    #[test]
    fn test_external_text() {
        let registry = Registry::new()
            .register(Code::new(7), Metadata::new("Try again later", "db timeout"));

        let coded = Node::from_message("pool exhausted".into(), Code::new(7), Frame::UNKNOWN);
        assert_eq!(coded.external_text_in(&registry), "Try again later");
        assert_eq!(coded.internal_text_in(&registry), "db timeout");

        let unknown = Node::from_message("x".into(), Code::UNKNOWN, Frame::UNKNOWN);
        assert_eq!(unknown.external_text_in(&registry), "x");

        let fatal = Node::from_message("x".into(), Code::FATAL, Frame::UNKNOWN);
        assert_eq!(fatal.external_text_in(&registry), "Internal Server Error");

        let unspecified = Node::from_message("x".into(), Code::UNSPECIFIED, Frame::UNKNOWN);
        assert_eq!(unspecified.external_text_in(&registry), "x");
    }
}

use alloc::{string::ToString, vec::Vec};
use core::fmt;

use serde::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;

use super::{Entry, Format};
use crate::Chain;

/// One element of the JSON array. `caller` is written first.
#[derive(Serialize)]
struct Object<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    caller: Option<alloc::string::String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<'a> Object<'a> {
    fn new(entry: &'a Entry<'_>, with_caller: bool) -> Self {
        Self {
            caller: with_caller.then(|| entry.caller().to_string()),
            error: Some(&*entry.text).filter(|text| !text.is_empty()),
        }
    }
}

pub(super) fn write<W: fmt::Write + ?Sized>(
    out: &mut W,
    entries: &[Entry<'_>],
    with_caller: bool,
    pretty: bool,
) -> fmt::Result {
    let objects: Vec<Object<'_>> = entries
        .iter()
        .map(|entry| Object::new(entry, with_caller))
        .collect();

    let bytes = if pretty {
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        objects.serialize(&mut serializer).map_err(|_| fmt::Error)?;
        buffer
    } else {
        serde_json::to_vec(&objects).map_err(|_| fmt::Error)?
    };

    out.write_str(core::str::from_utf8(&bytes).map_err(|_| fmt::Error)?)
}

/// Serializes the full trace as an array of `{"caller", "error"}` objects,
/// outermost node first.
///
/// ```
/// use errtrail::{Chain, Code};
///
/// let chain = Chain::new("a").wrap(Code::UNKNOWN, "b").wrap(Code::UNKNOWN, "c");
/// let value = serde_json::to_value(&chain).unwrap();
/// let errors: Vec<_> = value
///     .as_array()
///     .unwrap()
///     .iter()
///     .map(|object| object["error"].as_str().unwrap())
///     .collect();
/// assert_eq!(errors, ["c", "b", "a"]);
/// ```
impl Serialize for Chain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = Entry::collect(self, true);
        serializer.collect_seq(entries.iter().map(|entry| Object::new(entry, true)))
    }
}

impl Format {
    /// Renders `chain` as a JSON value with the given flags, regardless of
    /// the `json` flag and verb.
    #[must_use]
    pub fn to_json_value(&self, chain: &Chain) -> serde_json::Value {
        let with_caller = self.with_caller || self.with_full_trace;
        let entries = Entry::collect(chain, self.with_full_trace);
        let objects: Vec<Object<'_>> = entries
            .iter()
            .map(|entry| Object::new(entry, with_caller))
            .collect();
        serde_json::to_value(objects).unwrap_or_default()
    }
}

use crate::{error::ParseError, stream::ByteStream};

/// A structured value that knows how to read itself out of a [`ByteStream`].
///
/// Concrete format types implement [`read`](Self::read); everything a type
/// needs beyond its stream arrives through the `parent`/`root` references,
/// which are borrowed only for the duration of construction. Because `read`
/// returns `Result<Self, _>`, a node either comes back fully parsed or not
/// at all: a failure in a nested field propagates with `?` and aborts every
/// enclosing construction, and no partially-initialized node is ever
/// observable.
///
/// A parent or root reference always points at a *finished* node: in a
/// single forward pass that is the already-parsed ancestor prefix (typically
/// a header type) whose fields downstream expressions consume. Types parsed
/// only at the root use `()` for [`Parent`](Self::Parent).
pub trait FormatRead<'buf>: Sized {
    /// Immediate enclosing node type, as far as this type wants to see it.
    type Parent;
    /// Root node type of the tree this type appears in.
    type Root;

    /// Pulls every field of `Self` out of `io`, in order, optionally
    /// spawning substreams and nested [`FormatRead`] constructions.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`] from the stream, or a `Validation*` error raised
    /// by the type's own post-read contract checks.
    fn read(
        io: &mut ByteStream<'buf>,
        parent: Option<&Self::Parent>,
        root: Option<&Self::Root>,
    ) -> Result<Self, ParseError>;

    /// Parses a tree root straight out of a whole buffer.
    ///
    /// # Errors
    ///
    /// Propagates whatever [`read`](Self::read) raises.
    fn from_bytes(bytes: &'buf [u8]) -> Result<Self, ParseError> {
        let mut io = ByteStream::new(bytes);
        Self::read(&mut io, None, None)
    }
}

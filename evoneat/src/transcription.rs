use crate::errors::Error;
use crate::substrate::Substrate;

/// Produces the decoded substrate of a genome from its
/// encoded one.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, encoded: &Substrate) -> Result<Substrate, Error>;
}

/// Direct encoding: the decoded substrate is the encoded
/// one with disabled connections dropped.
///
/// # Examples
/// ```
/// use evoneat::{NeatTranscriber, Transcriber};
/// use evoneat::substrate::{Activation, Connection, Node, Position, Substrate};
///
/// let a = Position::planar(0.0, 0.0);
/// let b = Position::planar(1.0, 0.0);
/// let mut conn = Connection::new(a, b, 1.0);
/// conn.enabled = false;
/// let encoded = Substrate::from_parts(
///     vec![Node::input(a), Node::output(b, Activation::Sigmoid, 0.0)],
///     vec![conn],
/// )
/// .unwrap();
///
/// let decoded = NeatTranscriber.transcribe(&encoded).unwrap();
/// assert_eq!(decoded.nodes().len(), 2);
/// assert!(decoded.conns().is_empty());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct NeatTranscriber;

impl Transcriber for NeatTranscriber {
    fn transcribe(&self, encoded: &Substrate) -> Result<Substrate, Error> {
        let mut decoded = encoded.clone();
        decoded.retain_conns(|c| c.enabled);
        Ok(decoded)
    }
}

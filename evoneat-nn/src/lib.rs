//! # EvoNEAT-NN
//! Layered feed-forward networks for the [`evoneat`] engine.
//!
//! Provides a [`FeedForwardTranslator`], usable as the
//! [`Translator`](evoneat::Translator) of an experiment, which
//! turns decoded substrates into [`FeedForwardNetwork`]s. A
//! network evaluates a whole batch of input rows at once with
//! dense matrix products, one per pair of connected layers.
//!
//! # Example usage
//! ```
//! use evoneat::Translator;
//! use evoneat::substrate::{Activation, Connection, Node, Position, Substrate};
//! use evoneat_nn::FeedForwardTranslator;
//! use ndarray::array;
//!
//! let (a, b) = (Position::planar(0.0, 0.0), Position::planar(1.0, 0.0));
//! let substrate = Substrate::from_parts(
//!     vec![Node::input(a), Node::output(b, Activation::Direct, 0.5)],
//!     vec![Connection::new(a, b, 2.0)],
//! )
//! .unwrap();
//!
//! let network = FeedForwardTranslator.translate(&substrate).unwrap();
//! let outputs = network.activate(&array![[1.0], [-1.0]]).unwrap();
//! assert_eq!(outputs, array![[2.5], [-1.5]]);
//! ```

mod networks;

pub use networks::{FeedForwardNetwork, FeedForwardTranslator};
